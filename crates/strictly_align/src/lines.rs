//! Winning lines: generation and incremental pruning.
//!
//! A line is any window of exactly K consecutive cells along one of four
//! directions. The catalog starts with every such window and drops a line
//! as soon as both marks appear on it, since neither side can complete it
//! after that.

use crate::grid::Grid;
use crate::types::{Cell, Coord, Mark};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// Orientation of a line.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Direction {
    /// Left to right along a row.
    Horizontal,
    /// Top to bottom along a column.
    Vertical,
    /// Top-left to bottom-right.
    DiagonalDown,
    /// Bottom-left to top-right.
    DiagonalUp,
}

impl Direction {
    /// Valid start coordinates for a window of `k` cells on a
    /// `rows`×`cols` board. Empty when the window does not fit.
    fn starts(self, rows: usize, cols: usize, k: usize) -> Vec<Coord> {
        let (row_range, col_range) = match self {
            Direction::Horizontal => (0..rows, 0..(cols + 1).saturating_sub(k)),
            Direction::Vertical => (0..(rows + 1).saturating_sub(k), 0..cols),
            Direction::DiagonalDown => (
                0..(rows + 1).saturating_sub(k),
                0..(cols + 1).saturating_sub(k),
            ),
            Direction::DiagonalUp => (
                if k <= rows { k - 1..rows } else { 0..0 },
                0..(cols + 1).saturating_sub(k),
            ),
        };
        row_range
            .flat_map(|row| col_range.clone().map(move |col| Coord::new(row, col)))
            .collect()
    }

    /// The `i`-th cell of a line starting at `start`.
    fn step(self, start: Coord, i: usize) -> Coord {
        match self {
            Direction::Horizontal => Coord::new(start.row, start.col + i),
            Direction::Vertical => Coord::new(start.row + i, start.col),
            Direction::DiagonalDown => Coord::new(start.row + i, start.col + i),
            Direction::DiagonalUp => Coord::new(start.row - i, start.col + i),
        }
    }
}

/// Ordered run of K cells on one axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    direction: Direction,
    cells: Vec<Coord>,
}

impl Line {
    /// Direction of the line.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The cells, in order from the start coordinate.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// Counts what currently occupies the line's cells.
    pub fn tally(&self, grid: &Grid) -> Tally {
        let mut tally = Tally::default();
        for &coord in &self.cells {
            match grid.get(coord) {
                Some(Cell::Occupied(Mark::X)) => tally.x += 1,
                Some(Cell::Occupied(Mark::O)) => tally.o += 1,
                Some(Cell::Empty) => {
                    tally.empty += 1;
                    tally.last_empty = Some(coord);
                }
                None => {}
            }
        }
        tally
    }

    /// Whether both marks appear on the line.
    pub fn is_dead(&self, grid: &Grid) -> bool {
        let tally = self.tally(grid);
        tally.x > 0 && tally.o > 0
    }

    /// If `mark` holds every cell but one and that one is empty, returns it.
    pub fn completion_cell(&self, grid: &Grid, mark: Mark) -> Option<Coord> {
        let tally = self.tally(grid);
        (tally.of(mark) + 1 == self.cells.len() && tally.empty == 1)
            .then_some(tally.last_empty)
            .flatten()
    }

    /// Whether `mark` holds every cell.
    pub fn is_complete_for(&self, grid: &Grid, mark: Mark) -> bool {
        self.tally(grid).of(mark) == self.cells.len()
    }
}

/// Occupancy counts for one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Cells holding X.
    pub x: usize,
    /// Cells holding O.
    pub o: usize,
    /// Empty cells.
    pub empty: usize,
    /// Last empty cell seen, if any.
    pub last_empty: Option<Coord>,
}

impl Tally {
    /// Count for `mark`.
    pub fn of(&self, mark: Mark) -> usize {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }
}

/// Enumerates every line of `k` cells on a `rows`×`cols` board.
///
/// The result size is
/// `rows·(cols−k+1) + cols·(rows−k+1) + 2·(rows−k+1)·(cols−k+1)` whenever
/// `k ≤ min(rows, cols)`.
#[instrument]
pub fn generate(rows: usize, cols: usize, k: usize) -> Vec<Line> {
    if k == 0 {
        return Vec::new();
    }
    let lines: Vec<Line> = Direction::iter()
        .flat_map(|direction| {
            direction
                .starts(rows, cols, k)
                .into_iter()
                .map(move |start| Line {
                    direction,
                    cells: (0..k).map(|i| direction.step(start, i)).collect(),
                })
        })
        .collect();
    debug!(count = lines.len(), "Generated lines");
    lines
}

/// The live set of lines still completable by at least one mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCatalog {
    k: usize,
    lines: Vec<Line>,
}

impl LineCatalog {
    /// Builds the full catalog for a board.
    #[instrument]
    pub fn new(rows: usize, cols: usize, k: usize) -> Self {
        Self {
            k,
            lines: generate(rows, cols, k),
        }
    }

    /// Marks needed to win.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Remaining lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Iterates remaining lines.
    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Number of remaining lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line remains.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether nobody can complete a line any more.
    pub fn is_exhausted(&self) -> bool {
        self.is_empty()
    }

    /// Drops every line that holds both marks. Returns how many were removed.
    ///
    /// Idempotent; a line owned entirely by one mark is never removed.
    #[instrument(skip(self, grid), fields(before = self.lines.len()))]
    pub fn prune(&mut self, grid: &Grid) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !line.is_dead(grid));
        let removed = before - self.lines.len();
        debug!(removed, remaining = self.lines.len(), "Pruned lines");
        removed
    }

    /// Lines where `mark` is one move from completion and that move can be
    /// played right now under `playable`.
    pub fn threats<'a, F>(&'a self, grid: &'a Grid, mark: Mark, playable: F) -> impl Iterator<Item = Coord> + 'a
    where
        F: Fn(&Grid, Coord) -> bool + 'a,
    {
        self.lines
            .iter()
            .filter_map(move |line| line.completion_cell(grid, mark))
            .filter(move |coord| playable(grid, *coord))
    }

    /// Number of lines where `mark` is one empty cell from completion.
    pub fn winning_paths(&self, grid: &Grid, mark: Mark) -> usize {
        self.lines
            .iter()
            .filter(|line| line.completion_cell(grid, mark).is_some())
            .count()
    }
}

impl<'a> IntoIterator for &'a LineCatalog {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
