//! Line-oriented interactive session over an allocation engine.
use super::{table, ui};
use crate::core::config::DisplayConfig;
use crate::core::{Action, ActionKind, AllocationEngine};
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

const HELP: &str = "\
Commands:
  pct ROW INPUT   grow or shrink ROW by INPUT percent
  val ROW INPUT   set ROW to INPUT
  show            print the table
  total           print the grand total
  reset           restore the starting values
  help            print this message
  quit            leave the session";

enum Command {
    Reallocate(Action),
    Show,
    Total,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Command::Show;
    };
    let kind = match verb {
        "pct" | "%" => Some(ActionKind::Percentage),
        "val" | "=" => Some(ActionKind::Absolute),
        _ => None,
    };
    if let Some(kind) = kind {
        return match parts.next() {
            Some(row_id) => {
                let raw_input = parts.collect::<Vec<_>>().join(" ");
                Command::Reallocate(Action::new(row_id, kind, raw_input))
            }
            None => Command::Unknown(line.to_string()),
        };
    }
    match verb {
        "show" | "ls" => Command::Show,
        "total" => Command::Total,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Reads commands from `input` until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    engine: &mut AllocationEngine,
    display: &DisplayConfig,
    input: R,
    output: &mut W,
) -> Result<()> {
    writeln!(output, "{}", table::render(engine.table(), display))?;
    writeln!(output, "Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        debug!(line = %line, "Session input");
        match parse_command(line.trim()) {
            Command::Reallocate(action) => match engine.dispatch(&action) {
                Some(change) => {
                    writeln!(output, "{}", table::render(engine.table(), display))?;
                    writeln!(
                        output,
                        "{}: {:.p$} -> {:.p$} ({:.2}%)",
                        change.row_id,
                        change.previous,
                        change.current,
                        change.variance,
                        p = display.precision
                    )?;
                }
                None => writeln!(
                    output,
                    "{}",
                    ui::style_text(
                        &format!(
                            "Ignored: '{}' is not a number or '{}' is not a row",
                            action.raw_input, action.row_id
                        ),
                        ui::StyleType::Error
                    )
                )?,
            },
            Command::Show => writeln!(output, "{}", table::render(engine.table(), display))?,
            Command::Total => writeln!(
                output,
                "Grand Total: {:.p$}",
                engine.grand_total(),
                p = display.precision
            )?,
            Command::Reset => {
                engine.reset();
                writeln!(output, "{}", table::render(engine.table(), display))?;
            }
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => break,
            Command::Unknown(text) => {
                writeln!(output, "Unknown command '{text}'. Type 'help' for commands.")?
            }
        }
        writeln!(output, "{}", ui::separator())?;
    }
    Ok(())
}
