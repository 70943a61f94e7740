//! Strictly Align - terminal entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::cell::RefCell;
use std::rc::Rc;
use strictly_align_cli::{Cli, Command, Settings, lines, play, simulate};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_align=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            board,
            player_x,
            player_o,
            rematches,
        } => {
            let mut settings = Settings::resolve(&board).context("Failed to load settings")?;
            settings.set_players(player_x, player_o);
            run_play(&settings, rematches)
        }
        Command::Simulate { board, games, json } => {
            let settings = Settings::resolve(&board).context("Failed to load settings")?;
            run_simulate(&settings, games, json)
        }
        Command::Lines {
            rows,
            cols,
            k,
            json,
        } => {
            let summary = lines(rows, cols, k);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
            }
            Ok(())
        }
    }
}

/// Runs interactive matches on stdin/stdout.
#[instrument(skip(settings))]
fn run_play(settings: &Settings, rematches: u32) -> Result<()> {
    info!("Starting Strictly Align");
    let reader = Rc::new(RefCell::new(std::io::stdin().lock()));
    let results = play(settings, rematches, reader, std::io::stdout()).context("Match aborted")?;
    info!(matches = results.len(), "Done");
    Ok(())
}

/// Runs a batch of computer matches and prints the tally.
#[instrument(skip(settings))]
fn run_simulate(settings: &Settings, games: u32, json: bool) -> Result<()> {
    let summary = simulate(settings, games).context("Simulation failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}
