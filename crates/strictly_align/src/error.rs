//! Error types for match setup and move application.
//!
//! Every error here is recoverable: validation happens before any grid or
//! catalog mutation, so the caller can simply retry.

use crate::types::{Coord, Mark};
use derive_more::{Display, Error, From};

/// A move that cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Row or column outside the grid.
    #[display("Position ({row}, {col}) is out of bounds")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already holds a mark.
    #[display("Cell {_0} is already occupied")]
    CellOccupied(#[error(not(source))] Coord),

    /// The target column has no empty cell left.
    #[display("Column {_0} is full")]
    ColumnFull(#[error(not(source))] usize),

    /// A column was given to free placement, or a cell to gravity drop.
    #[display("Move descriptor does not match the placement rule")]
    WrongSlotKind,

    /// The match has already been decided.
    #[display("Match is already over")]
    GameOver,
}

/// Rejected match configuration.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    /// Board too small for the chosen variant.
    #[display("Board must be at least {min}x{min}, got {rows}x{cols}")]
    InvalidDimensions {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Smallest allowed side for the variant.
        min: usize,
    },

    /// Marks-to-align outside `3..=max`.
    #[display("Marks to align must be between 3 and {max}, got {k}")]
    InvalidAlignment {
        /// Requested K.
        k: usize,
        /// Largest K the board allows.
        max: usize,
    },
}

/// Failure reported by an external move source.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum InputError {
    /// Input could not be understood; ask again.
    #[display("Invalid input: {_0}")]
    Malformed(#[error(not(source))] String),

    /// The source has no more input to give.
    #[display("Input source closed")]
    Closed,
}

/// Error that ends a controller run.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum MatchError {
    /// An automated agent produced an illegal move.
    #[display("Agent for {mark} played an illegal move")]
    #[from(ignore)]
    AgentMove {
        /// Offending mark.
        mark: Mark,
        /// Why the move was rejected.
        source: MoveError,
    },

    /// Move application failed outside of an agent turn.
    #[display("Move failed")]
    Move(MoveError),

    /// The input collaborator gave up.
    #[display("Move source failed")]
    Input(InputError),

    /// An agent was asked to move with nothing left to play.
    #[display("No move available for {_0}")]
    #[from(ignore)]
    NoMoveAvailable(#[error(not(source))] Mark),
}
