//! The computer opponent: a fixed-priority tier search.
//!
//! Tiers, first hit wins:
//! 1. complete one of our own lines,
//! 2. block the opponent's one-move win,
//! 3. block an opponent fork,
//! 4. create our own fork,
//! 5. center, then corners, then a random open slot.
//!
//! Fork tiers try each open slot with a [`Speculation`](crate::Speculation)
//! guard, so the grid is back to its original contents after every trial.
//! The catalog is read but never pruned here.

use super::{Agent, Turn};
use crate::error::MatchError;
use crate::grid::Grid;
use crate::lines::LineCatalog;
use crate::placement::PlacementRule;
use crate::types::{Mark, Slot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Which tier produced a decision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Tier {
    /// Completes a line.
    Win,
    /// Stops the opponent completing a line.
    Block,
    /// Takes the cell where the opponent would fork.
    BlockFork,
    /// Opens two winning lines at once.
    CreateFork,
    /// Center, corner or random.
    Positional,
}

impl Tier {
    /// Short narration for the tier.
    pub fn describe(self) -> &'static str {
        match self {
            Tier::Win => "decided to attack",
            Tier::Block => "blocked an easy win",
            Tier::BlockFork => "blocked a fork",
            Tier::CreateFork => "is trying a tricky move",
            Tier::Positional => "played a classic move",
        }
    }
}

/// A chosen move and, for the computer, the tier behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Move descriptor.
    pub slot: Slot,
    /// Tier that produced it (`None` for human input).
    pub tier: Option<Tier>,
}

impl Decision {
    /// A decision made by the tier search.
    pub fn from_tier(slot: Slot, tier: Tier) -> Self {
        Self {
            slot,
            tier: Some(tier),
        }
    }

    /// A decision supplied from outside.
    pub fn external(slot: Slot) -> Self {
        Self { slot, tier: None }
    }
}

/// Four-tier heuristic opponent.
#[derive(Debug)]
pub struct HeuristicAgent {
    name: String,
    rng: StdRng,
    fork_tiers: Option<bool>,
}

impl HeuristicAgent {
    /// Creates an agent seeded from the OS.
    #[instrument(skip(name))]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_os_rng(),
            fork_tiers: None,
        }
    }

    /// Creates an agent with a fixed seed for the random fallback.
    #[instrument(skip(name))]
    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
            fork_tiers: None,
        }
    }

    /// Forces the fork tiers on or off regardless of variant.
    pub fn with_fork_tiers(mut self, enabled: bool) -> Self {
        self.fork_tiers = Some(enabled);
        self
    }

    /// Runs the tier search. `None` only when no slot is open.
    #[instrument(skip(self, turn), fields(agent = %self.name, mark = %turn.mark))]
    pub fn decide(&mut self, turn: &mut Turn<'_>) -> Option<Decision> {
        let own = turn.mark;
        let opponent = own.opponent();
        let rule = turn.rule;

        if let Some(slot) = find_completion(turn.grid, turn.catalog, rule, own) {
            return Some(Decision::from_tier(slot, Tier::Win));
        }
        if let Some(slot) = find_completion(turn.grid, turn.catalog, rule, opponent) {
            return Some(Decision::from_tier(slot, Tier::Block));
        }

        let forks = self
            .fork_tiers
            .unwrap_or_else(|| rule.variant().forks_by_default());
        if forks {
            if let Some(slot) = find_fork(turn.grid, turn.catalog, rule, opponent) {
                return Some(Decision::from_tier(slot, Tier::BlockFork));
            }
            if let Some(slot) = find_fork(turn.grid, turn.catalog, rule, own) {
                return Some(Decision::from_tier(slot, Tier::CreateFork));
            }
        }

        self.positional(turn.grid, rule)
            .map(|slot| Decision::from_tier(slot, Tier::Positional))
    }

    fn positional(&mut self, grid: &Grid, rule: &dyn PlacementRule) -> Option<Slot> {
        let open = rule.available_slots(grid);
        if open.is_empty() {
            return None;
        }

        let center = rule.center(grid);
        if open.contains(&center) {
            return Some(center);
        }
        if let Some(corner) = rule.corners(grid).into_iter().find(|c| open.contains(c)) {
            return Some(corner);
        }

        let pick = open[self.rng.random_range(0..open.len())];
        debug!(slot = %pick, choices = open.len(), "Random fallback");
        Some(pick)
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, turn: &mut Turn<'_>) -> Result<Decision, MatchError> {
        let mark = turn.mark;
        let decision = self
            .decide(turn)
            .ok_or(MatchError::NoMoveAvailable(mark))?;
        if let Some(tier) = decision.tier {
            info!(agent = %self.name, %tier, slot = %decision.slot, "{} {}", self.name, tier.describe());
        }
        Ok(decision)
    }
}

/// First line where `mark` needs one more cell and that cell is playable now.
fn find_completion(
    grid: &Grid,
    catalog: &LineCatalog,
    rule: &dyn PlacementRule,
    mark: Mark,
) -> Option<Slot> {
    catalog
        .threats(grid, mark, |g, coord| rule.is_playable(g, coord))
        .next()
        .map(|coord| rule.slot_for(coord))
}

/// First open slot where placing `mark` leaves two or more one-move wins.
fn find_fork(
    grid: &mut Grid,
    catalog: &LineCatalog,
    rule: &dyn PlacementRule,
    mark: Mark,
) -> Option<Slot> {
    for slot in rule.available_slots(grid) {
        let Ok(coord) = rule.resolve(grid, slot) else {
            continue;
        };
        let Ok(trial) = grid.speculate(coord, mark) else {
            continue;
        };
        let paths = catalog.winning_paths(&trial, mark);
        drop(trial);
        if paths >= 2 {
            debug!(%mark, %slot, paths, "Fork found");
            return Some(slot);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Variant;
    use crate::types::Coord;

    fn board(rows: &[&str]) -> Grid {
        let mut grid = Grid::new(rows.len(), rows[0].len());
        for (row, text) in rows.iter().enumerate() {
            for (col, ch) in text.chars().enumerate() {
                match ch {
                    'X' => grid.place(Coord::new(row, col), Mark::X).unwrap(),
                    'O' => grid.place(Coord::new(row, col), Mark::O).unwrap(),
                    _ => {}
                }
            }
        }
        grid
    }

    fn decide(grid: &mut Grid, k: usize, variant: Variant, mark: Mark) -> Decision {
        let mut catalog = LineCatalog::new(grid.rows(), grid.cols(), k);
        catalog.prune(grid);
        let mut agent = HeuristicAgent::seeded("test", 7);
        let mut turn = Turn {
            grid,
            catalog: &catalog,
            rule: variant.rule(),
            mark,
        };
        agent.decide(&mut turn).expect("a move is available")
    }

    #[test]
    fn test_win_preferred_over_block() {
        let mut grid = board(&["XX.", "OO.", "..."]);
        let decision = decide(&mut grid, 3, Variant::Free, Mark::X);
        assert_eq!(decision, Decision::from_tier(Slot::cell(0, 2), Tier::Win));
    }

    #[test]
    fn test_block_when_no_win() {
        let mut grid = board(&["OO.", "X..", "..X"]);
        let decision = decide(&mut grid, 3, Variant::Free, Mark::X);
        assert_eq!(decision, Decision::from_tier(Slot::cell(0, 2), Tier::Block));
    }

    #[test]
    fn test_create_fork() {
        let mut grid = board(&["X..", ".O.", "..X"]);
        let decision = decide(&mut grid, 3, Variant::Free, Mark::X);
        assert_eq!(
            decision,
            Decision::from_tier(Slot::cell(0, 2), Tier::CreateFork)
        );
    }

    #[test]
    fn test_block_fork() {
        // O can fork at (0, 2): row 0 and column 2.
        let mut grid = board(&["O..", ".X.", "..O"]);
        let decision = decide(&mut grid, 3, Variant::Free, Mark::X);
        assert_eq!(decision.tier, Some(Tier::BlockFork));
        assert_eq!(decision.slot, Slot::cell(0, 2));
    }

    #[test]
    fn test_center_first_on_empty_board() {
        let mut grid = Grid::new(5, 5);
        let decision = decide(&mut grid, 4, Variant::Free, Mark::X);
        assert_eq!(
            decision,
            Decision::from_tier(Slot::cell(2, 2), Tier::Positional)
        );
    }

    #[test]
    fn test_corner_after_center_taken() {
        let mut grid = board(&["...", ".O.", "..."]);
        let decision = decide(&mut grid, 3, Variant::Free, Mark::X);
        assert_eq!(
            decision,
            Decision::from_tier(Slot::cell(0, 0), Tier::Positional)
        );
    }

    #[test]
    fn test_gravity_block_on_supported_gap() {
        let mut grid = board(&[
            ".....",
            ".....",
            ".....",
            "XXX..",
            "OOOX.",
        ]);
        // O's bottom row is capped by X; X's gap at (3, 3) sits on a filled cell.
        let decision = decide(&mut grid, 4, Variant::Gravity, Mark::O);
        assert_eq!(decision, Decision::from_tier(Slot::Column(3), Tier::Block));
    }

    #[test]
    fn test_gravity_skips_floating_threat() {
        let mut grid = board(&[
            ".....",
            ".....",
            ".....",
            "XXX..",
            "OOX.O",
        ]);
        // X's gap at (3, 3) floats over an empty (4, 3).
        let decision = decide(&mut grid, 4, Variant::Gravity, Mark::O);
        assert_eq!(
            decision,
            Decision::from_tier(Slot::Column(2), Tier::Positional)
        );
    }

    #[test]
    fn test_gravity_vertical_win() {
        let mut grid = board(&[
            ".....",
            ".....",
            "O....",
            "O.X..",
            "O.XXX",
        ]);
        let decision = decide(&mut grid, 4, Variant::Gravity, Mark::O);
        assert_eq!(decision, Decision::from_tier(Slot::Column(0), Tier::Win));
    }

    #[test]
    fn test_speculation_leaves_grid_untouched() {
        let mut grid = board(&["X....", ".O...", ".....", "...O.", "X...."]);
        let before = grid.clone();
        decide(&mut grid, 4, Variant::Free, Mark::X);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_random_fallback_picks_open_slot() {
        // Center column and both corner columns are full.
        let mut grid = board(&[
            "X.X.O",
            "O.O.X",
            "X.X.O",
            "O.O.X",
            "X.X.O",
        ]);
        let decision = decide(&mut grid, 5, Variant::Gravity, Mark::O);
        assert_eq!(decision.tier, Some(Tier::Positional));
        assert!(matches!(decision.slot, Slot::Column(1) | Slot::Column(3)));
    }

    #[test]
    fn test_forks_opt_in_under_gravity() {
        let rows = [".....", ".....", ".....", ".OO..", ".XX.."];

        let mut grid = board(&rows);
        let decision = decide(&mut grid, 4, Variant::Gravity, Mark::X);
        assert_eq!(decision.tier, Some(Tier::Positional));

        let mut grid = board(&rows);
        let mut catalog = LineCatalog::new(5, 5, 4);
        catalog.prune(&grid);
        let mut agent = HeuristicAgent::seeded("test", 1).with_fork_tiers(true);
        let mut turn = Turn {
            grid: &mut grid,
            catalog: &catalog,
            rule: Variant::Gravity.rule(),
            mark: Mark::X,
        };
        // Column 3 opens both (4,0)-(4,3) and (4,1)-(4,4).
        let decision = agent.decide(&mut turn).expect("move");
        assert_eq!(
            decision,
            Decision::from_tier(Slot::Column(3), Tier::CreateFork)
        );
    }
}
