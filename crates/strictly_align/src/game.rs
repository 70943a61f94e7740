//! Match state: grid, catalog, turn pointer and the move pipeline.
//!
//! Every real move runs the same pipeline: resolve → place → prune →
//! win check → draw check. Validation always happens before the grid is
//! written, so a rejected move leaves the match exactly as it was.

use crate::error::{ConfigError, MoveError};
use crate::grid::Grid;
use crate::lines::{Line, LineCatalog};
use crate::placement::{PlacementRule, Variant};
use crate::players::Turn;
use crate::rules;
use crate::types::{Coord, Mark, Slot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Validated board shape and win length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchConfig {
    rows: usize,
    cols: usize,
    k: usize,
    variant: Variant,
}

impl MatchConfig {
    /// Validates a configuration.
    ///
    /// Free placement needs at least 3×3 and `3 ≤ k ≤ min(rows, cols)`;
    /// gravity needs at least 5×5 and `3 ≤ k ≤ rows`.
    #[instrument]
    pub fn new(rows: usize, cols: usize, k: usize, variant: Variant) -> Result<Self, ConfigError> {
        let min = variant.min_side();
        if rows < min || cols < min {
            return Err(ConfigError::InvalidDimensions { rows, cols, min });
        }
        let max = variant.max_alignment(rows, cols);
        if !(3..=max).contains(&k) {
            return Err(ConfigError::InvalidAlignment { k, max });
        }
        Ok(Self {
            rows,
            cols,
            k,
            variant,
        })
    }

    /// Classic 3×3, three in a row.
    pub fn tic_tac_toe() -> Self {
        Self {
            rows: 3,
            cols: 3,
            k: 3,
            variant: Variant::Free,
        }
    }

    /// Classic 6 rows × 7 columns, four in a row, gravity.
    pub fn connect_four() -> Self {
        Self {
            rows: 6,
            cols: 7,
            k: 4,
            variant: Variant::Gravity,
        }
    }

    /// Rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Marks to align.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Board variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }
}

/// Where the match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    /// Waiting on `Mark` to play.
    AwaitingMove(Mark),
    /// `Mark` completed a line.
    WinDeclared(Mark),
    /// Nobody can win any more.
    DrawDeclared,
}

impl MatchState {
    /// Whether the match has ended.
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchState::AwaitingMove(_))
    }
}

/// Result of applying one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The mover won.
    WinDeclared(Mark),
    /// The match is drawn.
    DrawDeclared,
    /// Play passes to the other mark.
    Continue,
}

/// One applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Who moved.
    pub mark: Mark,
    /// What was requested.
    pub slot: Slot,
    /// Where the mark landed.
    pub coord: Coord,
}

/// A single match.
#[derive(Debug, Clone)]
pub struct Match {
    config: MatchConfig,
    grid: Grid,
    catalog: LineCatalog,
    state: MatchState,
    history: Vec<MoveRecord>,
    winning_line: Option<Line>,
}

/// Validates dimensions and creates a fresh match.
#[instrument]
pub fn configure_match(
    rows: usize,
    cols: usize,
    k: usize,
    variant: Variant,
) -> Result<Match, ConfigError> {
    MatchConfig::new(rows, cols, k, variant).map(Match::new)
}

impl Match {
    /// Creates a fresh match; X moves first.
    #[instrument]
    pub fn new(config: MatchConfig) -> Self {
        let catalog = LineCatalog::new(config.rows, config.cols, config.k);
        info!(
            rows = config.rows,
            cols = config.cols,
            k = config.k,
            variant = %config.variant,
            lines = catalog.len(),
            "Match created"
        );
        Self {
            config,
            grid: Grid::new(config.rows, config.cols),
            catalog,
            state: MatchState::AwaitingMove(Mark::X),
            history: Vec::new(),
            winning_line: None,
        }
    }

    /// Rebuilds a match by replaying `slots`, stopping at the first
    /// terminal outcome.
    #[instrument(skip(slots), fields(moves = slots.len()))]
    pub fn replay(config: MatchConfig, slots: &[Slot]) -> Result<Self, MoveError> {
        let mut game = Self::new(config);
        for &slot in slots {
            if game.apply_move(slot)? != MoveOutcome::Continue {
                break;
            }
        }
        Ok(game)
    }

    /// The configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The live catalog.
    pub fn catalog(&self) -> &LineCatalog {
        &self.catalog
    }

    /// Current state.
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Mark to move, or `None` once the match is over.
    pub fn to_move(&self) -> Option<Mark> {
        match self.state {
            MatchState::AwaitingMove(mark) => Some(mark),
            _ => None,
        }
    }

    /// Moves applied so far.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// The completed line, once someone has won.
    pub fn winning_line(&self) -> Option<&Line> {
        self.winning_line.as_ref()
    }

    /// The placement rule for this match.
    pub fn rule(&self) -> &'static dyn PlacementRule {
        self.config.variant.rule()
    }

    /// Legal move descriptors right now.
    pub fn available_slots(&self) -> Vec<Slot> {
        if self.state.is_terminal() {
            return Vec::new();
        }
        self.rule().available_slots(&self.grid)
    }

    /// Lends the grid and catalog to the agent whose turn it is.
    pub fn turn(&mut self) -> Option<Turn<'_>> {
        let mark = self.to_move()?;
        Some(Turn {
            grid: &mut self.grid,
            catalog: &self.catalog,
            rule: self.config.variant.rule(),
            mark,
        })
    }

    /// Applies a move for the mark to play.
    ///
    /// On error nothing has changed and the same mark is still to move.
    #[instrument(skip(self), fields(mark = ?self.to_move()))]
    pub fn apply_move(&mut self, slot: Slot) -> Result<MoveOutcome, MoveError> {
        let MatchState::AwaitingMove(mark) = self.state else {
            return Err(MoveError::GameOver);
        };
        let coord = self.rule().resolve(&self.grid, slot)?;
        self.grid.place(coord, mark)?;
        self.history.push(MoveRecord { mark, slot, coord });

        self.catalog.prune(&self.grid);

        let outcome = if let Some(line) = rules::winning_line(&self.catalog, &self.grid, mark) {
            info!(%mark, line = ?line.cells(), "Win declared");
            self.winning_line = Some(line.clone());
            self.state = MatchState::WinDeclared(mark);
            MoveOutcome::WinDeclared(mark)
        } else if rules::is_draw(&self.grid, &self.catalog, self.rule()) {
            info!(remaining_lines = self.catalog.len(), "Draw declared");
            self.state = MatchState::DrawDeclared;
            MoveOutcome::DrawDeclared
        } else {
            self.state = MatchState::AwaitingMove(mark.opponent());
            MoveOutcome::Continue
        };
        debug!(%mark, %coord, ?outcome, "Move applied");

        #[cfg(debug_assertions)]
        {
            use crate::invariants::{InvariantSet, MatchInvariants};
            let check = MatchInvariants::check_all(self);
            debug_assert!(check.is_ok(), "Match invariants violated: {check:?}");
        }

        Ok(outcome)
    }

    /// Clears the board for a new match with the same configuration.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.grid.clear();
        self.catalog = LineCatalog::new(self.config.rows, self.config.cols, self.config.k);
        self.state = MatchState::AwaitingMove(Mark::X);
        self.history.clear();
        self.winning_line = None;
        info!("Match restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_small_boards() {
        assert_eq!(
            MatchConfig::new(2, 3, 3, Variant::Free),
            Err(ConfigError::InvalidDimensions {
                rows: 2,
                cols: 3,
                min: 3
            })
        );
        assert_eq!(
            MatchConfig::new(4, 7, 4, Variant::Gravity),
            Err(ConfigError::InvalidDimensions {
                rows: 4,
                cols: 7,
                min: 5
            })
        );
    }

    #[test]
    fn test_config_rejects_bad_alignment() {
        assert_eq!(
            MatchConfig::new(4, 6, 5, Variant::Free),
            Err(ConfigError::InvalidAlignment { k: 5, max: 4 })
        );
        assert_eq!(
            MatchConfig::new(5, 5, 2, Variant::Free),
            Err(ConfigError::InvalidAlignment { k: 2, max: 5 })
        );
        assert!(MatchConfig::new(7, 5, 7, Variant::Gravity).is_ok());
        assert!(MatchConfig::new(5, 7, 6, Variant::Gravity).is_err());
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in [MatchConfig::tic_tac_toe(), MatchConfig::connect_four()] {
            assert_eq!(
                MatchConfig::new(preset.rows(), preset.cols(), preset.k(), preset.variant()),
                Ok(preset)
            );
        }
    }

    #[test]
    fn test_illegal_move_leaves_state_untouched() {
        let mut game = Match::new(MatchConfig::tic_tac_toe());
        game.apply_move(Slot::cell(1, 1)).unwrap();
        let grid = game.grid().clone();
        let lines = game.catalog().len();

        assert_eq!(
            game.apply_move(Slot::cell(1, 1)),
            Err(MoveError::CellOccupied(Coord::new(1, 1)))
        );
        assert_eq!(game.apply_move(Slot::Column(0)), Err(MoveError::WrongSlotKind));
        assert_eq!(game.grid(), &grid);
        assert_eq!(game.catalog().len(), lines);
        assert_eq!(game.to_move(), Some(Mark::O));
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_win_records_line() {
        let game = Match::replay(
            MatchConfig::tic_tac_toe(),
            &[
                Slot::cell(0, 0),
                Slot::cell(1, 1),
                Slot::cell(0, 1),
                Slot::cell(2, 2),
                Slot::cell(0, 2),
            ],
        )
        .unwrap();
        assert_eq!(game.state(), MatchState::WinDeclared(Mark::X));
        assert_eq!(
            game.winning_line().map(|l| l.cells().to_vec()),
            Some(vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)])
        );
        assert_eq!(game.to_move(), None);
        assert!(game.available_slots().is_empty());
    }

    #[test]
    fn test_moves_after_game_over_rejected() {
        let mut game = Match::replay(
            MatchConfig::tic_tac_toe(),
            &[
                Slot::cell(0, 0),
                Slot::cell(1, 0),
                Slot::cell(0, 1),
                Slot::cell(1, 1),
                Slot::cell(0, 2),
            ],
        )
        .unwrap();
        assert_eq!(game.apply_move(Slot::cell(2, 2)), Err(MoveError::GameOver));
    }

    #[test]
    fn test_replay_stops_at_terminal_outcome() {
        let game = Match::replay(
            MatchConfig::tic_tac_toe(),
            &[
                Slot::cell(0, 0),
                Slot::cell(1, 0),
                Slot::cell(0, 1),
                Slot::cell(1, 1),
                Slot::cell(0, 2),
                Slot::cell(2, 2),
            ],
        )
        .unwrap();
        assert_eq!(game.history().len(), 5);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = Match::new(MatchConfig::connect_four());
        game.apply_move(Slot::Column(3)).unwrap();
        game.apply_move(Slot::Column(3)).unwrap();
        game.restart();
        assert_eq!(game.grid(), &Grid::new(6, 7));
        assert_eq!(game.catalog(), &LineCatalog::new(6, 7, 4));
        assert_eq!(game.state(), MatchState::AwaitingMove(Mark::X));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_gravity_history_records_landing_cell() {
        let mut game = Match::new(MatchConfig::connect_four());
        game.apply_move(Slot::Column(2)).unwrap();
        game.apply_move(Slot::Column(2)).unwrap();
        assert_eq!(
            game.history()[1],
            MoveRecord {
                mark: Mark::O,
                slot: Slot::Column(2),
                coord: Coord::new(4, 2),
            }
        );
    }
}
