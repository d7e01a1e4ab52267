//! # omni - Interactive Developer Assistant
//!
//! `omni` is a terminal chat session with an OpenAI-compatible completion
//! service. Lines starting with `/` are commands acting on local session
//! state; anything else is sent as a chat turn and the reply streams back.
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENROUTER_API_KEY=...
//! omni
//! ❯ /add src
//! ❯ explain how the parser handles errors
//! ❯ /save chat.json
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `~/.config/omni/config.toml`:
//!
//! ```toml
//! [omni]
//! model = "anthropic/claude-3.7-sonnet:thinking"
//! endpoint = "https://openrouter.ai/api/v1/chat/completions"
//! api_key_env = "OPENROUTER_API_KEY"
//! diff = true
//! ```

/// Interactive session: state, command dispatch and chat turns.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Streaming chat completion client.
pub mod completion;

/// Configuration file management.
pub mod config;

/// Text diff rendering.
pub mod diff;

/// File and undo commands.
pub mod files;

/// File system utilities.
pub mod fs;

/// Image encoding for `/image`.
pub mod image;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Web search client.
pub mod search;

/// Terminal UI components (spinner, colors).
pub mod ui;
