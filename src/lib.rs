pub mod cli;
pub mod core;

use crate::core::AllocationEngine;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::io::{self, Write};
use tracing::{debug, info};

pub enum AppCommand {
    Show { json: bool },
    Apply { actions: Vec<String>, json: bool },
    Interactive,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_with_output(command, config_path, &mut io::stdout())
}

/// Runs `command`, writing everything it displays to `output`.
pub fn run_command_with_output<W: Write>(
    command: AppCommand,
    config_path: Option<&str>,
    output: &mut W,
) -> Result<()> {
    info!("budgetree starting...");

    let config = load_config(config_path)?;
    let table = config.seed_table()?;
    let mut engine = AllocationEngine::new(table, config.allocation.child_updates);

    match command {
        AppCommand::Show { json } => {
            cli::apply::run(&mut engine, &[], &config.display, json, output)
        }
        AppCommand::Apply { actions, json } => {
            cli::apply::run(&mut engine, &actions, &config.display, json, output)
        }
        AppCommand::Interactive => {
            let stdin = io::stdin();
            cli::session::run(&mut engine, &config.display, stdin.lock(), output)
        }
    }
}
