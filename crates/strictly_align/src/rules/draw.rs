//! Draw detection.

use crate::grid::Grid;
use crate::lines::LineCatalog;
use crate::placement::PlacementRule;
use tracing::instrument;

/// Whether the match is drawn: no legal slot left, or no line left that
/// either mark could still complete.
///
/// Callers check for a win first; this does not.
#[instrument(skip_all, fields(remaining_lines = catalog.len()))]
pub fn is_draw(grid: &Grid, catalog: &LineCatalog, rule: &dyn PlacementRule) -> bool {
    catalog.is_exhausted() || rule.available_slots(grid).is_empty()
}
