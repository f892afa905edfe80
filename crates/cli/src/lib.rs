pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "tradein",
    about = "Trade-in bot operator CLI",
    long_about = "Operator tooling for the trade-in fulfillment backend.",
    after_help = "Examples:\n  tradein replay --file turn.json --year 2017\n  cat turn.json | tradein replay\n  tradein config\n  tradein doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run one request through the dialog dispatcher and print the directive")]
    Replay {
        #[arg(long, help = "Read the request from this file instead of stdin")]
        file: Option<PathBuf>,
        #[arg(long, help = "Pin the current year instead of reading the system clock")]
        year: Option<i32>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and run a canned dialog turn as a self-check")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Replay { file, year } => commands::replay::run(file.as_deref(), year),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
