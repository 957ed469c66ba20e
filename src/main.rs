use anyhow::Result;
use budgetree::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for budgetree::AppCommand {
    fn from(cmd: Commands) -> budgetree::AppCommand {
        match cmd {
            Commands::Show { json } => budgetree::AppCommand::Show { json },
            Commands::Apply { actions, json } => budgetree::AppCommand::Apply { actions, json },
            Commands::Interactive => budgetree::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the budget table
    Show {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply reallocations in order and display the result
    Apply {
        /// ROW=VALUE sets a row, ROW%=PERCENT grows or shrinks it
        #[arg(required = true, allow_hyphen_values = true)]
        actions: Vec<String>,
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reallocate rows interactively
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => budgetree::cli::setup::setup(),
        Some(cmd) => budgetree::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
