//! Match settings loaded from TOML.

use crate::cli::BoardArgs;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_align::{ConfigError, MatchConfig, Variant};
use tracing::{debug, info, instrument};

/// Who controls a mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerKind {
    /// Moves typed at the terminal.
    Human,
    /// The heuristic agent.
    #[default]
    Cpu,
}

impl PlayerKind {
    /// Whether moves come from a person.
    pub fn is_human(self) -> bool {
        matches!(self, PlayerKind::Human)
    }
}

/// Settings for one `play` or `simulate` run.
///
/// Missing board dimensions fall back to the variant's classic board:
/// 3×3 with three in a row for free placement, 6×7 with four in a row for
/// gravity.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// Rows on the board.
    #[serde(default)]
    rows: Option<usize>,

    /// Columns on the board.
    #[serde(default)]
    cols: Option<usize>,

    /// Marks in a row needed to win.
    #[serde(default)]
    k: Option<usize>,

    /// Board variant.
    #[serde(default)]
    variant: Variant,

    /// Who plays X.
    #[serde(default = "default_player_x")]
    player_x: PlayerKind,

    /// Who plays O.
    #[serde(default)]
    player_o: PlayerKind,

    /// Display name for X.
    #[serde(default)]
    name_x: Option<String>,

    /// Display name for O.
    #[serde(default)]
    name_o: Option<String>,

    /// Seed for the computer players.
    #[serde(default)]
    seed: Option<u64>,

    /// Fork tier override for computer players.
    #[serde(default)]
    fork_tiers: Option<bool>,
}

fn default_player_x() -> PlayerKind {
    PlayerKind::Human
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: None,
            cols: None,
            k: None,
            variant: Variant::default(),
            player_x: default_player_x(),
            player_o: PlayerKind::default(),
            name_x: None,
            name_o: None,
            seed: None,
            fork_tiers: None,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SettingsError::new(format!("Failed to read settings file: {}", e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::new(format!("Failed to parse settings: {}", e)))?;

        info!(variant = %settings.variant, "Settings loaded");
        Ok(settings)
    }

    /// Loads the file named in `args` (or defaults) and applies the flags.
    #[instrument(skip(args))]
    pub fn resolve(args: &BoardArgs) -> Result<Self, SettingsError> {
        let mut settings = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply(args);
        Ok(settings)
    }

    /// Overrides file values with any flags given on the command line.
    pub fn apply(&mut self, args: &BoardArgs) {
        self.rows = args.rows.or(self.rows);
        self.cols = args.cols.or(self.cols);
        self.k = args.k.or(self.k);
        if let Some(variant) = args.variant {
            self.variant = variant;
        }
        self.seed = args.seed.or(self.seed);
        self.fork_tiers = args.fork_tiers.or(self.fork_tiers);
    }

    /// Overrides who plays each mark.
    pub fn set_players(&mut self, player_x: Option<PlayerKind>, player_o: Option<PlayerKind>) {
        if let Some(kind) = player_x {
            self.player_x = kind;
        }
        if let Some(kind) = player_o {
            self.player_o = kind;
        }
    }

    /// Validated board configuration.
    pub fn match_config(&self) -> Result<MatchConfig, ConfigError> {
        let classic = match self.variant {
            Variant::Free => MatchConfig::tic_tac_toe(),
            Variant::Gravity => MatchConfig::connect_four(),
        };
        MatchConfig::new(
            self.rows.unwrap_or(classic.rows()),
            self.cols.unwrap_or(classic.cols()),
            self.k.unwrap_or(classic.k()),
            self.variant,
        )
    }
}

/// Settings error.
#[derive(Debug, Clone, Display, Error)]
#[display("Settings error: {} at {}:{}", message, file, line)]
pub struct SettingsError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SettingsError {
    /// Creates a new settings error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_tic_tac_toe() {
        let settings = Settings::default();
        assert_eq!(settings.match_config(), Ok(MatchConfig::tic_tac_toe()));
        assert!(settings.player_x().is_human());
        assert!(!settings.player_o().is_human());
    }

    #[test]
    fn test_gravity_defaults_to_connect_four() {
        let mut settings = Settings::default();
        settings.apply(&BoardArgs {
            variant: Some(Variant::Gravity),
            ..BoardArgs::default()
        });
        assert_eq!(settings.match_config(), Ok(MatchConfig::connect_four()));
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut settings: Settings = toml::from_str("rows = 5\ncols = 5\nk = 4\n").unwrap();
        settings.apply(&BoardArgs {
            k: Some(3),
            seed: Some(9),
            ..BoardArgs::default()
        });
        assert_eq!(*settings.rows(), Some(5));
        assert_eq!(*settings.k(), Some(3));
        assert_eq!(*settings.seed(), Some(9));
    }

    #[test]
    fn test_player_kind_parses() {
        assert_eq!("human".parse::<PlayerKind>(), Ok(PlayerKind::Human));
        assert_eq!(PlayerKind::Cpu.to_string(), "cpu");
    }
}
