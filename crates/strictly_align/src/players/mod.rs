//! Agents that choose moves: the heuristic opponent and the human proxy.
//!
//! The controller only sees the [`Agent`] trait and never cares which kind
//! it is talking to, apart from whether illegal moves should be retried.

mod heuristic;
mod human;

pub use heuristic::{Decision, HeuristicAgent, Tier};
pub use human::{HumanProxy, MoveSource, ScriptedMoves};

use crate::error::MatchError;
use crate::grid::Grid;
use crate::lines::LineCatalog;
use crate::placement::PlacementRule;
use crate::types::Mark;

/// Everything an agent may look at when choosing a move.
///
/// The grid is lent mutably so the heuristic agent can try hypothetical
/// marks; every such trial is reverted before `choose_move` returns.
#[derive(Debug)]
pub struct Turn<'a> {
    /// The live grid.
    pub grid: &'a mut Grid,
    /// The live (pruned) catalog.
    pub catalog: &'a LineCatalog,
    /// Placement rule for this match.
    pub rule: &'static dyn PlacementRule,
    /// Mark to move.
    pub mark: Mark,
}

/// A participant in a match.
pub trait Agent {
    /// Display name.
    fn name(&self) -> &str;

    /// Chooses the next move.
    fn choose_move(&mut self, turn: &mut Turn<'_>) -> Result<Decision, MatchError>;

    /// Whether rejected moves should be reported back for another try
    /// instead of ending the match.
    fn retries_illegal_moves(&self) -> bool {
        false
    }
}

/// Default display name: `Player_X` for humans, `Computer_X` for the agent.
pub fn default_name(human: bool, mark: Mark) -> String {
    if human {
        format!("Player_{mark}")
    } else {
        format!("Computer_{mark}")
    }
}
