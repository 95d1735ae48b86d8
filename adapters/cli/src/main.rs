#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a recorded match through the Rampart agent.
//!
//! Each turn's intents are written to stdout as one JSON line. Logs go to
//! stderr and honour `RUST_LOG`.

mod transcript;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use rampart_agent::Agent;
use rampart_core::{Command, Doctrine, GameConfig, UnitCatalog};
use rampart_world::Arena;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::transcript::Transcript;

/// Replays a recorded match transcript and prints the agent's intents.
#[derive(Debug, Parser)]
#[command(name = "rampart", version)]
struct CliArgs {
    /// Engine game configuration (JSON) listing the unit types.
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
    /// Recorded match transcript (JSON).
    #[arg(long, value_name = "PATH")]
    transcript: PathBuf,
    /// Doctrine overrides (TOML); omitted fields keep their reference values.
    #[arg(long, value_name = "PATH")]
    doctrine: Option<PathBuf>,
    /// Seed for the plan-selection generator; drawn from OS entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

/// One output line.
#[derive(Serialize)]
struct TurnOutput<'a> {
    turn: u32,
    commands: &'a [Command],
}

/// Entry point for the Rampart command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    run(&args)
}

fn run(args: &CliArgs) -> Result<()> {
    let config: GameConfig = serde_json::from_str(&read(&args.config)?)
        .with_context(|| format!("parsing game config {}", args.config.display()))?;
    let catalog = UnitCatalog::from_config(&config).context("resolving unit catalog")?;

    let doctrine = match &args.doctrine {
        Some(path) => toml::from_str::<Doctrine>(&read(path)?)
            .with_context(|| format!("parsing doctrine {}", path.display()))?,
        None => Doctrine::default(),
    };

    let transcript = Transcript::from_json(&read(&args.transcript)?)
        .with_context(|| format!("loading transcript {}", args.transcript.display()))?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut agent = Agent::new(doctrine, &catalog, seed);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    for recorded in &transcript.turns {
        let (snapshot, events) = recorded
            .resolve(&catalog)
            .with_context(|| format!("resolving turn {}", recorded.turn))?;
        let arena = Arena::from_snapshot(&snapshot, &catalog);
        let commands = agent.on_turn(&snapshot, &events, &arena);

        let line = serde_json::to_string(&TurnOutput {
            turn: snapshot.turn(),
            commands: &commands,
        })
        .context("serialising turn output")?;
        writeln!(stdout, "{line}").context("writing turn output")?;
    }

    tracing::info!(
        turns = transcript.turns.len(),
        seed = agent.seed(),
        "replay finished"
    );
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
