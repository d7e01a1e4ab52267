//! Command routing table.
//!
//! Each slash command is a [`CommandHandler`] registered by name. Lines whose
//! first token names no handler become chat turns.

use anyhow::Result;
use async_trait::async_trait;
use std::io::{self, Write};

use super::command::{Route, route};
use super::handlers;
use super::state::SessionState;
use super::turn::run_chat_turn;
use crate::completion::CompletionClient;
use crate::search::SearchClient;

/// What the session does after a line is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Network clients shared by every handler.
pub struct Services {
    pub completion: CompletionClient,
    pub search: SearchClient,
}

/// Everything a handler may touch while it runs.
pub struct Context<'a> {
    pub state: &'a mut SessionState,
    pub services: &'a Services,
    pub out: &'a mut (dyn Write + Send),
    /// A human is at a terminal: show spinners, honor Ctrl+C while streaming.
    pub interactive: bool,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// The exact token that selects this handler, slash included.
    fn name(&self) -> &'static str;

    /// Usage line for handlers that need at least one argument.
    ///
    /// When set and no arguments are given, `print_usage` runs instead of
    /// `execute`.
    fn usage(&self) -> Option<&'static str> {
        None
    }

    /// Reports a missing argument.
    fn print_usage(&self, out: &mut (dyn Write + Send)) -> io::Result<()> {
        match self.usage() {
            Some(usage) => writeln!(out, "Usage: {usage}"),
            None => Ok(()),
        }
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome>;
}

#[derive(Default)]
pub struct Registry {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in command.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for handler in handlers::builtins() {
            registry.register(handler);
        }
        registry
    }

    /// Adds a handler, replacing any handler with the same name.
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
        self.handlers.retain(|h| h.name() != handler.name());
        self.handlers.push(handler);
    }

    pub fn get(&self, name: &str) -> Option<&dyn CommandHandler> {
        self.handlers
            .iter()
            .find(|h| h.name() == name)
            .map(|h| h.as_ref())
    }

    /// Routes and runs one input line. Prints nothing of its own.
    pub async fn dispatch(&self, line: &str, ctx: &mut Context<'_>) -> Result<Outcome> {
        match route(line, |name| self.get(name).is_some()) {
            Route::Empty => Ok(Outcome::Continue),
            Route::Command { name, args } => {
                let Some(handler) = self.get(name) else {
                    return Ok(Outcome::Continue);
                };
                if args.is_empty() && handler.usage().is_some() {
                    handler.print_usage(ctx.out)?;
                    return Ok(Outcome::Continue);
                }
                tracing::debug!(command = name, args = args.len(), "dispatching");
                handler.execute(&args, ctx).await
            }
            Route::Chat(text) => {
                run_chat_turn(&text, ctx).await?;
                Ok(Outcome::Continue)
            }
        }
    }
}
