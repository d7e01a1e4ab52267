//! Built-in slash command handlers.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use std::fs;
use std::path::Path;

use super::registry::{CommandHandler, Context, Outcome};
use super::state::ChatMessage;
use super::turn::interrupted;
use super::ui;
use crate::diff::DiffStyle;
use crate::files;
use crate::fs::atomic_write;
use crate::image::{encode_image, is_url};
use crate::search::format_results;
use crate::ui::{Style, write_error, write_success};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn builtins() -> Vec<Box<dyn CommandHandler>> {
    vec![
        Box::new(Help),
        Box::new(Exit),
        Box::new(Clear),
        Box::new(Show),
        Box::new(New),
        Box::new(Add),
        Box::new(Edit),
        Box::new(Diff),
        Box::new(History),
        Box::new(Save),
        Box::new(Load),
        Box::new(Undo),
        Box::new(Search),
        Box::new(Image),
        Box::new(Model),
        Box::new(ChangeModel),
        Box::new(Reset),
    ]
}

/// First argument; `usage()` guarantees there is one.
fn first(args: &[String]) -> &str {
    args.first().map_or("", String::as_str)
}

pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    fn name(&self) -> &'static str {
        "/help"
    }

    async fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        ui::print_help(ctx.out)?;
        Ok(Outcome::Continue)
    }
}

pub struct Exit;

#[async_trait]
impl CommandHandler for Exit {
    fn name(&self) -> &'static str {
        "/exit"
    }

    async fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        ui::print_goodbye(ctx.out)?;
        Ok(Outcome::Exit)
    }
}

pub struct Clear;

#[async_trait]
impl CommandHandler for Clear {
    fn name(&self) -> &'static str {
        "/clear"
    }

    async fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        ctx.out.write_all(CLEAR_SCREEN.as_bytes())?;
        ctx.out.flush()?;
        Ok(Outcome::Continue)
    }
}

pub struct Show;

#[async_trait]
impl CommandHandler for Show {
    fn name(&self) -> &'static str {
        "/show"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/show <filepath>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        files::show(first(args), ctx.out)?;
        Ok(Outcome::Continue)
    }
}

pub struct New;

#[async_trait]
impl CommandHandler for New {
    fn name(&self) -> &'static str {
        "/new"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/new <filepath>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        files::create(first(args), ctx.out)?;
        Ok(Outcome::Continue)
    }
}

pub struct Add;

#[async_trait]
impl CommandHandler for Add {
    fn name(&self) -> &'static str {
        "/add"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/add <path>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        files::add(first(args), ctx.state, ctx.out)?;
        Ok(Outcome::Continue)
    }
}

pub struct Edit;

#[async_trait]
impl CommandHandler for Edit {
    fn name(&self) -> &'static str {
        "/edit"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/edit <filepath>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        files::capture_for_edit(first(args), ctx.state, ctx.out)?;
        Ok(Outcome::Continue)
    }
}

pub struct Diff;

#[async_trait]
impl CommandHandler for Diff {
    fn name(&self) -> &'static str {
        "/diff"
    }

    async fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        let state = if ctx.state.toggle_diff() { "on" } else { "off" };
        writeln!(ctx.out, "Diff is now {}", Style::value(state))?;
        Ok(Outcome::Continue)
    }
}

pub struct History;

#[async_trait]
impl CommandHandler for History {
    fn name(&self) -> &'static str {
        "/history"
    }

    async fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        for message in ctx.state.transcript() {
            writeln!(ctx.out, "{}: {}", Style::role(message.role), message.content)?;
        }
        Ok(Outcome::Continue)
    }
}

pub struct Save;

#[async_trait]
impl CommandHandler for Save {
    fn name(&self) -> &'static str {
        "/save"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/save <filename>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        let filename = first(args);
        let result = serde_json::to_string_pretty(ctx.state.transcript())
            .context("Failed to serialize history")
            .and_then(|json| atomic_write(Path::new(filename), &json));

        match result {
            Ok(()) => write_success(ctx.out, format!("History saved to {}", Style::path(filename)))?,
            Err(e) => write_error(ctx.out, format!("{e:#}"))?,
        }
        Ok(Outcome::Continue)
    }
}

pub struct Load;

#[async_trait]
impl CommandHandler for Load {
    fn name(&self) -> &'static str {
        "/load"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/load <filename>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        let filename = first(args);
        let result = fs::read_to_string(filename)
            .with_context(|| format!("Failed to read {filename}"))
            .and_then(|json| {
                serde_json::from_str::<Vec<ChatMessage>>(&json)
                    .with_context(|| format!("Failed to parse {filename}"))
            })
            .and_then(|transcript| {
                let count = transcript.len();
                ctx.state
                    .replace_transcript(transcript)
                    .map_err(|e| anyhow::anyhow!("Failed to load {filename}: {e}"))?;
                Ok(count)
            });

        match result {
            Ok(count) => write_success(
                ctx.out,
                format!(
                    "History loaded from {} ({count} messages)",
                    Style::path(filename)
                ),
            )?,
            Err(e) => write_error(ctx.out, format!("{e:#}"))?,
        }
        Ok(Outcome::Continue)
    }
}

pub struct Undo;

#[async_trait]
impl CommandHandler for Undo {
    fn name(&self) -> &'static str {
        "/undo"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/undo <filepath>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        let style = if ctx.interactive {
            DiffStyle::Color
        } else {
            DiffStyle::Plain
        };
        files::undo(first(args), ctx.state, style, ctx.out)?;
        Ok(Outcome::Continue)
    }
}

pub struct Search;

#[async_trait]
impl CommandHandler for Search {
    fn name(&self) -> &'static str {
        "/search"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/search <query>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        let query = args.join(" ");
        let result = tokio::select! {
            biased;
            () = interrupted(ctx.interactive) => None,
            result = ctx.services.search.search(&query) => Some(result),
        };
        match result {
            Some(Ok(results)) => ctx.out.write_all(format_results(&results).as_bytes())?,
            Some(Err(e)) => write_error(ctx.out, format!("{e:#}"))?,
            None => writeln!(ctx.out, "{}", Style::hint("(interrupted)"))?,
        }
        Ok(Outcome::Continue)
    }
}

pub struct Image;

#[async_trait]
impl CommandHandler for Image {
    fn name(&self) -> &'static str {
        "/image"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/image <path/url...>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        for path in args {
            if is_url(path) {
                writeln!(ctx.out, "Image URL: {}", Style::path(path))?;
                continue;
            }
            match encode_image(path) {
                Ok(data_url) => writeln!(
                    ctx.out,
                    "Encoded image {} ({} bytes as data URL)",
                    Style::path(path),
                    data_url.len()
                )?,
                Err(e) => write_error(ctx.out, format!("{e:#}"))?,
            }
        }
        Ok(Outcome::Continue)
    }
}

pub struct Model;

#[async_trait]
impl CommandHandler for Model {
    fn name(&self) -> &'static str {
        "/model"
    }

    async fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        writeln!(
            ctx.out,
            "Current model: {}",
            Style::value(ctx.state.active_model())
        )?;
        Ok(Outcome::Continue)
    }
}

pub struct ChangeModel;

#[async_trait]
impl CommandHandler for ChangeModel {
    fn name(&self) -> &'static str {
        "/change_model"
    }

    fn usage(&self) -> Option<&'static str> {
        Some("/change_model <model_name>")
    }

    async fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        ctx.state.set_model(first(args));
        write_success(
            ctx.out,
            format!("Model changed to: {}", Style::value(first(args))),
        )?;
        Ok(Outcome::Continue)
    }
}

pub struct Reset;

#[async_trait]
impl CommandHandler for Reset {
    fn name(&self) -> &'static str {
        "/reset"
    }

    async fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        ctx.state.reset();
        write_success(ctx.out, "Chat and file memory reset")?;
        Ok(Outcome::Continue)
    }
}
