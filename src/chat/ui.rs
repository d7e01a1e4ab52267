//! Chat mode UI components.

use std::io::{self, Write};

use super::command::COMMANDS;
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(out: &mut (dyn Write + Send), model: &str) -> io::Result<()> {
    writeln!(
        out,
        "{} {} - Interactive Developer Assistant",
        Style::header("omni"),
        Style::version(format!("v{VERSION}"))
    )?;
    writeln!(out, "  {}  {}", Style::label("model"), Style::value(model))?;
    writeln!(out)
}

pub fn print_goodbye(out: &mut (dyn Write + Send)) -> io::Result<()> {
    writeln!(out, "{}", Style::success("Goodbye!"))
}

pub fn print_help(out: &mut (dyn Write + Send)) -> io::Result<()> {
    let width = COMMANDS.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);

    writeln!(out, "{}", Style::header("Commands"))?;
    for (cmd, description) in COMMANDS {
        // Pad before styling; escape codes would throw off the width.
        writeln!(
            out,
            "  {}  {}",
            Style::command(format!("{cmd:<width$}")),
            Style::secondary(description)
        )?;
    }
    writeln!(
        out,
        "\n{}",
        Style::hint("Anything that is not a command is sent to the assistant.")
    )
}
