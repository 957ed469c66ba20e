use super::table;
use crate::core::config::DisplayConfig;
use crate::core::{Action, ActionKind, AllocationEngine};
use anyhow::{Result, bail};
use std::io::Write;
use tracing::{debug, info};

/// Parses `ROW=INPUT` (absolute) or `ROW%=INPUT` (percentage).
///
/// Only the syntax is checked here. The input is kept raw so the engine can
/// ignore non-numeric values the same way it does for interactive input.
pub fn parse_action(spec: &str) -> Result<Action> {
    let Some((target, raw_input)) = spec.split_once('=') else {
        bail!("Invalid action '{spec}': expected ROW=VALUE or ROW%=PERCENT");
    };
    let (row_id, kind) = match target.strip_suffix('%') {
        Some(row_id) => (row_id, ActionKind::Percentage),
        None => (target, ActionKind::Absolute),
    };
    let row_id = row_id.trim();
    if row_id.is_empty() {
        bail!("Invalid action '{spec}': missing row id");
    }
    Ok(Action::new(row_id, kind, raw_input))
}

/// Applies `specs` in order and writes the resulting table to `output`.
pub fn run<W: Write>(
    engine: &mut AllocationEngine,
    specs: &[String],
    display: &DisplayConfig,
    json: bool,
    output: &mut W,
) -> Result<()> {
    let actions = specs
        .iter()
        .map(|s| parse_action(s))
        .collect::<Result<Vec<_>>>()?;

    for action in &actions {
        match engine.dispatch(action) {
            Some(change) => info!(
                row_id = %change.row_id,
                previous = change.previous,
                current = change.current,
                "Applied reallocation"
            ),
            None => debug!(?action, "Action ignored"),
        }
    }

    if json {
        serde_json::to_writer_pretty(&mut *output, &engine.snapshot())?;
        writeln!(output)?;
    } else {
        writeln!(output, "{}", table::render(engine.table(), display))?;
    }
    Ok(())
}
