//! Placement rules: where a requested move actually lands.
//!
//! Rules are stateless; the gravity rule reads the grid to find the landing
//! row but owns nothing itself.

use crate::error::MoveError;
use crate::grid::Grid;
use crate::types::{Coord, Slot};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Resolves move descriptors to cells for one board variant.
pub trait PlacementRule: std::fmt::Debug + Sync {
    /// The variant this rule implements.
    fn variant(&self) -> Variant;

    /// Resolves `slot` to the cell a mark would occupy, without mutating.
    fn resolve(&self, grid: &Grid, slot: Slot) -> Result<Coord, MoveError>;

    /// Whether an empty `coord` can be filled by the very next move.
    fn is_playable(&self, grid: &Grid, coord: Coord) -> bool;

    /// The descriptor an agent submits to fill `coord`.
    fn slot_for(&self, coord: Coord) -> Slot;

    /// Every legal descriptor for the current grid.
    fn available_slots(&self, grid: &Grid) -> Vec<Slot>;

    /// Preferred opening slot.
    fn center(&self, grid: &Grid) -> Slot;

    /// Corner slots, in preference order.
    fn corners(&self, grid: &Grid) -> Vec<Slot>;
}

/// Marks go to any empty cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreePlacement;

impl PlacementRule for FreePlacement {
    fn variant(&self) -> Variant {
        Variant::Free
    }

    #[instrument(skip(self, grid))]
    fn resolve(&self, grid: &Grid, slot: Slot) -> Result<Coord, MoveError> {
        let Slot::Cell(coord) = slot else {
            return Err(MoveError::WrongSlotKind);
        };
        if !grid.in_bounds(coord.row, coord.col) {
            return Err(MoveError::OutOfBounds {
                row: coord.row,
                col: coord.col,
            });
        }
        if !grid.is_empty(coord) {
            return Err(MoveError::CellOccupied(coord));
        }
        Ok(coord)
    }

    fn is_playable(&self, grid: &Grid, coord: Coord) -> bool {
        grid.is_empty(coord)
    }

    fn slot_for(&self, coord: Coord) -> Slot {
        Slot::Cell(coord)
    }

    fn available_slots(&self, grid: &Grid) -> Vec<Slot> {
        grid.empty_cells().map(Slot::Cell).collect()
    }

    fn center(&self, grid: &Grid) -> Slot {
        Slot::cell(grid.rows() / 2, grid.cols() / 2)
    }

    fn corners(&self, grid: &Grid) -> Vec<Slot> {
        let (last_row, last_col) = (grid.rows() - 1, grid.cols() - 1);
        vec![
            Slot::cell(0, 0),
            Slot::cell(0, last_col),
            Slot::cell(last_row, 0),
            Slot::cell(last_row, last_col),
        ]
    }
}

/// Marks fall to the lowest empty row of the chosen column.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityDrop;

impl PlacementRule for GravityDrop {
    fn variant(&self) -> Variant {
        Variant::Gravity
    }

    #[instrument(skip(self, grid))]
    fn resolve(&self, grid: &Grid, slot: Slot) -> Result<Coord, MoveError> {
        let Slot::Column(col) = slot else {
            return Err(MoveError::WrongSlotKind);
        };
        if col >= grid.cols() {
            return Err(MoveError::OutOfBounds { row: 0, col });
        }
        grid.lowest_empty_row(col)
            .map(|row| Coord::new(row, col))
            .ok_or(MoveError::ColumnFull(col))
    }

    fn is_playable(&self, grid: &Grid, coord: Coord) -> bool {
        grid.is_empty(coord) && grid.is_supported(coord)
    }

    fn slot_for(&self, coord: Coord) -> Slot {
        Slot::Column(coord.col)
    }

    fn available_slots(&self, grid: &Grid) -> Vec<Slot> {
        (0..grid.cols())
            .filter(|&col| !grid.is_column_full(col))
            .map(Slot::Column)
            .collect()
    }

    fn center(&self, grid: &Grid) -> Slot {
        Slot::Column(grid.cols() / 2)
    }

    fn corners(&self, grid: &Grid) -> Vec<Slot> {
        vec![Slot::Column(0), Slot::Column(grid.cols() - 1)]
    }
}

/// Board variant selector.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    /// Free placement ("align K").
    #[default]
    Free,
    /// Gravity drop ("connect K").
    Gravity,
}

static FREE_PLACEMENT: FreePlacement = FreePlacement;
static GRAVITY_DROP: GravityDrop = GravityDrop;

impl Variant {
    /// The placement rule for this variant.
    pub fn rule(self) -> &'static dyn PlacementRule {
        match self {
            Variant::Free => &FREE_PLACEMENT,
            Variant::Gravity => &GRAVITY_DROP,
        }
    }

    /// Smallest allowed board side.
    pub fn min_side(self) -> usize {
        match self {
            Variant::Free => 3,
            Variant::Gravity => 5,
        }
    }

    /// Largest marks-to-align for a `rows`×`cols` board.
    pub fn max_alignment(self, rows: usize, cols: usize) -> usize {
        match self {
            Variant::Free => rows.min(cols),
            Variant::Gravity => rows,
        }
    }

    /// Whether the fork tiers run by default for this variant.
    pub fn forks_by_default(self) -> bool {
        matches!(self, Variant::Free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mark;

    #[test]
    fn test_free_resolve_empty_cell() {
        let grid = Grid::new(3, 3);
        assert_eq!(
            FreePlacement.resolve(&grid, Slot::cell(2, 1)),
            Ok(Coord::new(2, 1))
        );
    }

    #[test]
    fn test_free_resolve_rejects_occupied_and_out_of_bounds() {
        let mut grid = Grid::new(3, 3);
        grid.place(Coord::new(1, 1), Mark::X).unwrap();
        assert_eq!(
            FreePlacement.resolve(&grid, Slot::cell(1, 1)),
            Err(MoveError::CellOccupied(Coord::new(1, 1)))
        );
        assert_eq!(
            FreePlacement.resolve(&grid, Slot::cell(0, 3)),
            Err(MoveError::OutOfBounds { row: 0, col: 3 })
        );
        assert_eq!(
            FreePlacement.resolve(&grid, Slot::Column(0)),
            Err(MoveError::WrongSlotKind)
        );
    }

    #[test]
    fn test_gravity_lands_on_lowest_empty_row() {
        let mut grid = Grid::new(6, 7);
        assert_eq!(
            GravityDrop.resolve(&grid, Slot::Column(3)),
            Ok(Coord::new(5, 3))
        );
        grid.place(Coord::new(5, 3), Mark::X).unwrap();
        assert_eq!(
            GravityDrop.resolve(&grid, Slot::Column(3)),
            Ok(Coord::new(4, 3))
        );
    }

    #[test]
    fn test_gravity_rejects_bad_column() {
        let grid = Grid::new(6, 7);
        assert_eq!(
            GravityDrop.resolve(&grid, Slot::Column(7)),
            Err(MoveError::OutOfBounds { row: 0, col: 7 })
        );
        assert_eq!(
            GravityDrop.resolve(&grid, Slot::cell(5, 0)),
            Err(MoveError::WrongSlotKind)
        );
    }

    #[test]
    fn test_gravity_available_slots_skip_full_columns() {
        let mut grid = Grid::new(5, 5);
        for row in 0..5 {
            grid.place(Coord::new(row, 2), Mark::O).unwrap();
        }
        assert_eq!(
            GravityDrop.available_slots(&grid),
            vec![Slot::Column(0), Slot::Column(1), Slot::Column(3), Slot::Column(4)]
        );
    }

    #[test]
    fn test_variant_parse_and_display() {
        assert_eq!("gravity".parse::<Variant>(), Ok(Variant::Gravity));
        assert_eq!(Variant::Free.to_string(), "free");
        assert_eq!(Variant::Gravity.rule().variant(), Variant::Gravity);
    }
}
