//! Consistent styling utilities for CLI output.
//!
//! Provides color and formatting helpers using owo-colors.

use owo_colors::OwoColorize;
use std::fmt::Display;

use crate::chat::Role;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Style for section headers (e.g., "Commands")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Style for labels/keys
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Style for primary values (e.g., model names)
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    /// Style for file paths and URLs
    pub fn path<T: Display>(text: T) -> String {
        format!("{}", text.underline())
    }

    /// Style for secondary/supplementary info (e.g., descriptions)
    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Style for success messages
    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    /// Style for error messages
    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    /// Style for warning messages
    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Style for commands (e.g., "/add", "/help")
    pub fn command<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    /// Style for a transcript role tag
    pub fn role(role: Role) -> String {
        let tag = format!("[{role}]");
        match role {
            Role::System => format!("{}", tag.dimmed()),
            Role::User => format!("{}", tag.blue().bold()),
            Role::Assistant => format!("{}", tag.magenta().bold()),
        }
    }

    /// Style for hints/help text
    pub fn hint<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }

    /// Style for version info
    pub fn version<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }
}
