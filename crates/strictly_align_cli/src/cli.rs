//! Command-line interface for strictly_align.

use crate::settings::PlayerKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strictly_align::Variant;

/// Strictly Align - K in a row on any board
#[derive(Parser, Debug)]
#[command(name = "strictly_align")]
#[command(about = "Align-K board games: free placement and gravity drop", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Board and agent options shared by `play` and `simulate`.
///
/// Every flag overrides the matching key from the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct BoardArgs {
    /// Path to a TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Number of columns
    #[arg(long)]
    pub cols: Option<usize>,

    /// Marks in a row needed to win
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Board variant (free or gravity)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Seed for the computer players' random fallback
    #[arg(long)]
    pub seed: Option<u64>,

    /// Force the fork tiers on or off for computer players
    #[arg(long)]
    pub fork_tiers: Option<bool>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match in the terminal
    Play {
        /// Board options
        #[command(flatten)]
        board: BoardArgs,

        /// Who plays X (human or cpu)
        #[arg(long)]
        player_x: Option<PlayerKind>,

        /// Who plays O (human or cpu)
        #[arg(long)]
        player_o: Option<PlayerKind>,

        /// Extra matches to play after the first
        #[arg(long, default_value = "0")]
        rematches: u32,
    },

    /// Run computer-vs-computer matches and report the tally
    Simulate {
        /// Board options
        #[command(flatten)]
        board: BoardArgs,

        /// Number of matches
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Print the tally as JSON
        #[arg(long)]
        json: bool,
    },

    /// List how many winning lines a board has
    Lines {
        /// Number of rows
        #[arg(long)]
        rows: usize,

        /// Number of columns
        #[arg(long)]
        cols: usize,

        /// Marks in a row needed to win
        #[arg(short, long)]
        k: usize,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}
