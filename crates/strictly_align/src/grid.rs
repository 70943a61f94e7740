//! The board: an owned rows×cols array of cells.

use crate::error::MoveError;
use crate::types::{Cell, Coord, Mark};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::instrument;

/// Rectangular board in row-major order. Row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty grid.
    #[instrument]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `(row, col)` lies inside the grid.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Gets the cell at `coord`, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Whether the cell at `coord` exists and is empty.
    pub fn is_empty(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Some(Cell::Empty))
    }

    /// Writes `mark` at `coord`.
    ///
    /// Only bounds are checked here; occupancy and gravity are the placement
    /// rule's job.
    pub fn place(&mut self, coord: Coord, mark: Mark) -> Result<(), MoveError> {
        let i = self.checked_index(coord)?;
        self.cells[i] = Cell::Occupied(mark);
        Ok(())
    }

    /// Restores `coord` to empty.
    pub fn remove(&mut self, coord: Coord) -> Result<(), MoveError> {
        let i = self.checked_index(coord)?;
        self.cells[i] = Cell::Empty;
        Ok(())
    }

    /// Places `mark` at an empty `coord` and returns a guard that restores
    /// the cell when dropped.
    pub fn speculate(&mut self, coord: Coord, mark: Mark) -> Result<Speculation<'_>, MoveError> {
        if !self.is_empty(coord) {
            return match self.get(coord) {
                None => Err(MoveError::OutOfBounds {
                    row: coord.row,
                    col: coord.col,
                }),
                Some(_) => Err(MoveError::CellOccupied(coord)),
            };
        }
        self.place(coord, mark)?;
        Ok(Speculation { grid: self, coord })
    }

    /// Lowest empty row in `col`, scanning from the bottom.
    pub fn lowest_empty_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows)
            .rev()
            .find(|&row| self.is_empty(Coord::new(row, col)))
    }

    /// Whether the top cell of `col` is occupied (or the column does not exist).
    pub fn is_column_full(&self, col: usize) -> bool {
        !self.is_empty(Coord::new(0, col))
    }

    /// Whether every cell below `coord` in its column is occupied.
    pub fn is_supported(&self, coord: Coord) -> bool {
        (coord.row + 1..self.rows).all(|row| !self.is_empty(Coord::new(row, coord.col)))
    }

    /// Iterates empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(|c| self.is_empty(*c))
    }

    /// Iterates every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coord::new(row, col)))
    }

    /// Whether no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Occupied(mark))
            .count()
    }

    /// Resets every cell to empty.
    #[instrument(skip(self), fields(rows = self.rows, cols = self.cols))]
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Formats the grid as plain text, one row per line, `.` for empty.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..self.rows {
            let line: Vec<&str> = (0..self.cols)
                .map(|col| match self.cells[row * self.cols + col] {
                    Cell::Empty => ".",
                    Cell::Occupied(Mark::X) => "X",
                    Cell::Occupied(Mark::O) => "O",
                })
                .collect();
            result.push_str(&line.join(" "));
            if row + 1 < self.rows {
                result.push('\n');
            }
        }
        result
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.in_bounds(coord.row, coord.col)
            .then(|| coord.row * self.cols + coord.col)
    }

    fn checked_index(&self, coord: Coord) -> Result<usize, MoveError> {
        self.index(coord).ok_or(MoveError::OutOfBounds {
            row: coord.row,
            col: coord.col,
        })
    }
}

/// A hypothetical mark on the grid, reverted when dropped.
///
/// Holding the guard borrows the grid mutably, so two speculative states can
/// never coexist.
#[derive(Debug)]
pub struct Speculation<'a> {
    grid: &'a mut Grid,
    coord: Coord,
}

impl Speculation<'_> {
    /// The speculatively occupied cell.
    pub fn coord(&self) -> Coord {
        self.coord
    }
}

impl Deref for Speculation<'_> {
    type Target = Grid;

    fn deref(&self) -> &Grid {
        self.grid
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        // coord was validated on entry
        let _ = self.grid.remove(self.coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.empty_cells().count(), 12);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_place_and_remove() {
        let mut grid = Grid::new(3, 3);
        let c = Coord::new(1, 2);
        grid.place(c, Mark::X).unwrap();
        assert_eq!(grid.get(c), Some(Cell::Occupied(Mark::X)));
        grid.remove(c).unwrap();
        assert!(grid.is_empty(c));
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut grid = Grid::new(3, 3);
        let err = grid.place(Coord::new(3, 0), Mark::O).unwrap_err();
        assert_eq!(err, MoveError::OutOfBounds { row: 3, col: 0 });
    }

    #[test]
    fn test_speculation_reverts_on_drop() {
        let mut grid = Grid::new(3, 3);
        grid.place(Coord::new(0, 0), Mark::O).unwrap();
        let before = grid.clone();
        {
            let trial = grid.speculate(Coord::new(1, 1), Mark::X).unwrap();
            assert_eq!(trial.count(Mark::X), 1);
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn test_speculation_rejects_occupied() {
        let mut grid = Grid::new(3, 3);
        grid.place(Coord::new(0, 0), Mark::O).unwrap();
        assert!(matches!(
            grid.speculate(Coord::new(0, 0), Mark::X),
            Err(MoveError::CellOccupied(_))
        ));
        assert_eq!(grid.get(Coord::new(0, 0)), Some(Cell::Occupied(Mark::O)));
    }

    #[test]
    fn test_lowest_empty_row() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(grid.lowest_empty_row(2), Some(4));
        grid.place(Coord::new(4, 2), Mark::X).unwrap();
        assert_eq!(grid.lowest_empty_row(2), Some(3));
        assert_eq!(grid.lowest_empty_row(7), None);
    }

    #[test]
    fn test_is_supported() {
        let mut grid = Grid::new(5, 5);
        assert!(grid.is_supported(Coord::new(4, 0)));
        assert!(!grid.is_supported(Coord::new(3, 0)));
        grid.place(Coord::new(4, 0), Mark::O).unwrap();
        assert!(grid.is_supported(Coord::new(3, 0)));
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(2, 3);
        grid.place(Coord::new(0, 1), Mark::X).unwrap();
        grid.place(Coord::new(1, 2), Mark::O).unwrap();
        assert_eq!(grid.display(), ". X .\n. . O");
    }

    #[test]
    fn test_clear() {
        let mut grid = Grid::new(3, 3);
        grid.place(Coord::new(2, 2), Mark::X).unwrap();
        grid.clear();
        assert_eq!(grid, Grid::new(3, 3));
    }
}
