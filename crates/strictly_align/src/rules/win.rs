//! Win detection.

use crate::grid::Grid;
use crate::lines::{Line, LineCatalog};
use crate::types::Mark;
use tracing::instrument;

/// Whether `mark` holds every cell of some line in the catalog.
///
/// Run against the pruned catalog: pruning never removes a line owned by a
/// single mark, so a just-completed line is still present.
#[instrument(skip(catalog, grid))]
pub fn has_win(catalog: &LineCatalog, grid: &Grid, mark: Mark) -> bool {
    winning_line(catalog, grid, mark).is_some()
}

/// The first completed line for `mark`, if any.
#[instrument(skip(catalog, grid))]
pub fn winning_line<'a>(catalog: &'a LineCatalog, grid: &Grid, mark: Mark) -> Option<&'a Line> {
    catalog.iter().find(|line| line.is_complete_for(grid, mark))
}
