//! Core domain types shared by every board variant.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A player's mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (always moves first).
    #[display("X")]
    X,
    /// Mark O (moves second).
    #[display("O")]
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell holds a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// A `(row, col)` coordinate. Row 0 is the top of the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    derive_new::new,
)]
#[display("({row}, {col})")]
pub struct Coord {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

/// A move descriptor as supplied by an agent.
///
/// Free placement takes a full coordinate; gravity drop takes only a column
/// and lets the placement rule decide the landing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Slot {
    /// Place at an exact cell.
    #[display("{_0}")]
    Cell(Coord),
    /// Drop into a column.
    #[display("column {_0}")]
    Column(usize),
}

impl Slot {
    /// Shorthand for a free-placement slot.
    pub fn cell(row: usize, col: usize) -> Self {
        Slot::Cell(Coord::new(row, col))
    }
}

impl From<Coord> for Slot {
    fn from(coord: Coord) -> Self {
        Slot::Cell(coord)
    }
}
