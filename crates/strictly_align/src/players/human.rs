//! Human proxy: forwards to an external move source.

use super::{Agent, Decision, Turn};
use crate::error::{InputError, MatchError};
use crate::grid::Grid;
use crate::types::{Mark, Slot};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Supplies moves from outside the engine (terminal, GUI, script).
pub trait MoveSource {
    /// Returns the next requested move for `mark`.
    ///
    /// `InputError::Malformed` is recoverable and the controller asks
    /// again; `InputError::Closed` ends the match.
    fn next_move(&mut self, grid: &Grid, mark: Mark) -> Result<Slot, InputError>;
}

impl<F> MoveSource for F
where
    F: FnMut(&Grid, Mark) -> Result<Slot, InputError>,
{
    fn next_move(&mut self, grid: &Grid, mark: Mark) -> Result<Slot, InputError> {
        self(grid, mark)
    }
}

/// A fixed queue of moves, for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    moves: VecDeque<Slot>,
}

impl ScriptedMoves {
    /// Creates a source that yields `moves` in order, then reports `Closed`.
    pub fn new(moves: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    /// Moves not yet consumed.
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveSource for ScriptedMoves {
    fn next_move(&mut self, _grid: &Grid, _mark: Mark) -> Result<Slot, InputError> {
        self.moves.pop_front().ok_or(InputError::Closed)
    }
}

/// A player whose moves come from a [`MoveSource`].
pub struct HumanProxy {
    name: String,
    source: Box<dyn MoveSource>,
}

impl HumanProxy {
    /// Creates a proxy reading from `source`.
    #[instrument(skip(name, source))]
    pub fn new(name: impl Into<String>, source: impl MoveSource + 'static) -> Self {
        Self {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

impl std::fmt::Debug for HumanProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HumanProxy")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Agent for HumanProxy {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, turn: &mut Turn<'_>) -> Result<Decision, MatchError> {
        debug!(player = %self.name, mark = %turn.mark, "Waiting for move");
        let slot = self.source.next_move(turn.grid, turn.mark)?;
        Ok(Decision::external(slot))
    }

    fn retries_illegal_moves(&self) -> bool {
        true
    }
}
