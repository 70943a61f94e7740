//! History replays to the current grid.

use super::Invariant;
use crate::game::Match;
use crate::grid::Grid;

/// Replaying the history onto an empty grid reproduces the live grid, and
/// no recorded move ever landed on an occupied cell.
pub struct HistoryConsistentInvariant;

impl Invariant<Match> for HistoryConsistentInvariant {
    fn holds(game: &Match) -> bool {
        let live = game.grid();
        let mut rebuilt = Grid::new(live.rows(), live.cols());

        for record in game.history() {
            if !rebuilt.is_empty(record.coord) {
                return false;
            }
            if rebuilt.place(record.coord, record.mark).is_err() {
                return false;
            }
        }

        rebuilt == *live
    }

    fn description() -> &'static str {
        "History replays to the current grid"
    }
}
