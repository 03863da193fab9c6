pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "statusbot",
    about = "Statusbot operator CLI",
    long_about = "Inspect statusbot configuration, run readiness checks, and simulate the \
                  conversational flow locally.",
    after_help = "Examples:\n  statusbot doctor --json\n  statusbot config\n  statusbot simulate"
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
    #[command(about = "Validate config and report collaborator readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Run the slot-filling conversation on the console against an in-memory index"
    )]
    Simulate,
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
        Command::Simulate => commands::simulate::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
