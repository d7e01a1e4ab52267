use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A terminal spinner shown while waiting for the first streamed token.
///
/// Draws to stderr and clears itself when dropped.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    /// Creates and starts a new spinner with the given message.
    pub fn new(message: &str) -> Self {
        let progress_bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
            .template("{spinner} {msg}")
        {
            progress_bar.set_style(style);
        }
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self { progress_bar }
    }

    /// A spinner that never draws, for non-interactive sessions.
    pub fn hidden() -> Self {
        Self {
            progress_bar: ProgressBar::hidden(),
        }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn stop(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}
