pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "dealdesk",
    about = "Dealdesk operator CLI",
    long_about = "Inspect Dealdesk configuration, check remote API readiness, and run headless deal conversions.",
    after_help = "Examples:\n  dealdesk doctor --json\n  dealdesk config\n  dealdesk convert --draft deal.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and check remote API reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Compose and submit a deal from a saved draft file without the wizard UI")]
    Convert {
        #[arg(long, help = "Path to a draft JSON file")]
        draft: PathBuf,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Convert { draft } => commands::convert::run(&draft),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
