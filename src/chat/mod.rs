//! Interactive assistant session.
//!
//! A line is either a slash command, routed through the [`Registry`], or a
//! chat turn streamed from the completion service.

/// Slash command table, routing and autocomplete.
pub mod command;
mod handlers;
mod registry;
mod session;
mod state;
mod turn;
mod ui;

pub use registry::{CommandHandler, Context, Outcome, Registry, Services};
pub use session::ChatSession;
pub use state::{ChatMessage, Role, SessionState};
pub use turn::run_chat_turn;
