#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted placement sessions.

mod scenario;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use placement_system_modes::ModeRegistry;
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

/// Replays object placement sessions without a game client.
#[derive(Debug, Parser)]
#[command(name = "placement-cli", version)]
struct Cli {
    /// Log filter directive, for example `placement=debug`.
    #[arg(long, global = true, default_value = "info")]
    log: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Runs every step of a scenario file and prints the transcript.
    Replay {
        /// Path to the scenario TOML file.
        scenario: PathBuf,
    },
    /// Lists the built-in placement modes.
    Modes,
}

/// Entry point for the placement command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;

    match cli.command {
        Command::Replay { scenario } => {
            let source = fs::read_to_string(&scenario)
                .with_context(|| format!("could not read {}", scenario.display()))?;
            let transcript = Scenario::from_toml_str(&source)?.replay()?;
            for line in transcript {
                println!("{line}");
            }
        }
        Command::Modes => {
            for name in ModeRegistry::with_builtin_modes().names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn init_tracing(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter `{directive}`"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    Ok(())
}
