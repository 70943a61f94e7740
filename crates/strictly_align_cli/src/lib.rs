//! Strictly Align CLI - terminal front end
//!
//! The input and rendering collaborators for `strictly_align` matches:
//! a clap command line, TOML settings, a stdin move source and a
//! plain-text board renderer.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod input;
mod render;
mod settings;

pub use cli::{BoardArgs, Cli, Command};
pub use commands::{LineSummary, SimulationSummary, computer_agent, lines, play, simulate};
pub use input::{PromptedMoves, parse_move};
pub use render::{SharedWriter, TextObserver, describe};
pub use settings::{PlayerKind, Settings, SettingsError};
