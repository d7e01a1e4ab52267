//! Subcommand implementations.

/// Interactive session entry point.
pub mod chat;
