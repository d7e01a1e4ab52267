//! Before/after text diffs for the terminal.
//!
//! Lines are diffed first; changed lines are then refined word by word so a
//! one-word edit does not paint the whole line.

use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

/// How inserted and deleted spans are marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStyle {
    /// Green insertions, red struck-through deletions.
    Color,
    /// `{+inserted+}` and `[-deleted-]` markers.
    Plain,
}

/// Renders the difference between `old` and `new`.
///
/// Unchanged lines are printed with a two-space gutter, changed lines with
/// `- ` or `+ `. Within a changed line only the differing words are marked.
pub fn render_diff(old: &str, new: &str, style: DiffStyle) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            let gutter = match change.tag() {
                ChangeTag::Equal => "  ",
                ChangeTag::Delete => "- ",
                ChangeTag::Insert => "+ ",
            };
            out.push_str(gutter);

            for (emphasized, value) in change.iter_strings_lossy() {
                let value = value.trim_end_matches('\n');
                if emphasized {
                    out.push_str(&mark(change.tag(), value, style));
                } else {
                    out.push_str(&tint(change.tag(), value, style));
                }
            }
            out.push('\n');
        }
    }

    out
}

fn mark(tag: ChangeTag, text: &str, style: DiffStyle) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = match (tag, style) {
        (ChangeTag::Insert, DiffStyle::Plain) => write!(out, "{{+{text}+}}"),
        (ChangeTag::Delete, DiffStyle::Plain) => write!(out, "[-{text}-]"),
        (ChangeTag::Insert, DiffStyle::Color) => write!(out, "{}", text.green().bold()),
        (ChangeTag::Delete, DiffStyle::Color) => {
            write!(out, "{}", text.red().bold().strikethrough())
        }
        (ChangeTag::Equal, _) => write!(out, "{text}"),
    };
    out
}

fn tint(tag: ChangeTag, text: &str, style: DiffStyle) -> String {
    match (tag, style) {
        (ChangeTag::Insert, DiffStyle::Color) => format!("{}", text.green()),
        (ChangeTag::Delete, DiffStyle::Color) => format!("{}", text.red()),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_has_no_markers() {
        let out = render_diff("a\nb\n", "a\nb\n", DiffStyle::Plain);
        assert_eq!(out, "  a\n  b\n");
    }

    #[test]
    fn test_inserted_line() {
        let out = render_diff("a\n", "a\nb\n", DiffStyle::Plain);
        assert!(out.contains("  a\n"));
        assert!(out.contains("+ "));
        assert!(out.contains('b'));
        assert!(!out.contains("- "));
    }

    #[test]
    fn test_deleted_line() {
        let out = render_diff("a\nb\n", "a\n", DiffStyle::Plain);
        assert!(out.contains("- "));
        assert!(!out.contains("+ "));
    }

    #[test]
    fn test_changed_word_is_marked_inline() {
        let out = render_diff(
            "let x = old_value;\n",
            "let x = new_value;\n",
            DiffStyle::Plain,
        );
        assert!(out.contains("[-old_value;-]"));
        assert!(out.contains("{+new_value;+}"));
        assert!(out.contains("let x = "));
    }

    #[test]
    fn test_color_style_contains_text() {
        let out = render_diff("one\n", "two\n", DiffStyle::Color);
        assert!(out.contains("one"));
        assert!(out.contains("two"));
        assert!(out.contains("\u{1b}["));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(render_diff("", "", DiffStyle::Plain), "");
    }
}
