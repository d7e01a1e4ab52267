use inquire::InquireError;
use std::fmt::Display;
use std::io::{self, Write};

mod spinner;
mod theme;

pub use spinner::Spinner;
pub use theme::Style;

/// Writes an `Error:` line. Handlers report failures here instead of returning them.
pub fn write_error(out: &mut (dyn Write + Send), message: impl Display) -> io::Result<()> {
    writeln!(out, "{} {message}", Style::error("Error:"))
}

pub fn write_warning(out: &mut (dyn Write + Send), message: impl Display) -> io::Result<()> {
    writeln!(out, "{} {message}", Style::warning("Warning:"))
}

pub fn write_success(out: &mut (dyn Write + Send), message: impl Display) -> io::Result<()> {
    writeln!(out, "{} {message}", Style::success("✓"))
}

/// Check if the inquire error is a user cancellation/interruption.
pub const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prompt_cancelled_operation_canceled() {
        assert!(is_prompt_cancelled(&InquireError::OperationCanceled));
    }

    #[test]
    fn test_is_prompt_cancelled_operation_interrupted() {
        assert!(is_prompt_cancelled(&InquireError::OperationInterrupted));
    }

    #[test]
    fn test_is_prompt_cancelled_other_error() {
        let err = InquireError::Custom("test".into());
        assert!(!is_prompt_cancelled(&err));
    }
}
