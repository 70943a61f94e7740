//! The catalog holds no dead line.

use super::Invariant;
use crate::game::Match;

/// No line left in the catalog carries both marks.
pub struct CatalogSoundInvariant;

impl Invariant<Match> for CatalogSoundInvariant {
    fn holds(game: &Match) -> bool {
        game.catalog().iter().all(|line| !line.is_dead(game.grid()))
    }

    fn description() -> &'static str {
        "Catalog contains only lines one mark can still complete"
    }
}
