//! Strictly Align - M×N align-K game engine
//!
//! Pure game logic for "K in a row" on any rectangular board, in two
//! flavours: free placement (tic-tac-toe and its larger cousins) and gravity
//! drop (connect four and friends).
//!
//! # Architecture
//!
//! - **Grid**: board storage with a scoped speculative-placement guard
//! - **Placement**: rules resolving a move descriptor to a landing cell
//! - **Lines**: every winning window, pruned as lines become unwinnable
//! - **Players**: the four-tier heuristic opponent and the human proxy
//! - **Match**: the move pipeline, history and replay
//! - **Controller**: turn alternation between two agents with an observer
//!
//! # Example
//!
//! ```
//! use strictly_align::{HeuristicAgent, Match, MatchConfig, MatchController, NullObserver};
//!
//! let mut controller = MatchController::new(
//!     Match::new(MatchConfig::tic_tac_toe()),
//!     Box::new(HeuristicAgent::seeded("Computer_X", 1)),
//!     Box::new(HeuristicAgent::seeded("Computer_O", 2)),
//!     Box::new(NullObserver),
//! );
//! let state = controller.run().unwrap();
//! assert!(state.is_terminal());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod controller;
mod error;
mod game;
mod grid;
mod invariants;
mod lines;
mod placement;
mod players;
mod types;

pub mod rules;

// Crate-level exports
pub use controller::{MatchController, MatchEvent, MatchObserver, NullObserver};
pub use error::{ConfigError, InputError, MatchError, MoveError};
pub use game::{Match, MatchConfig, MatchState, MoveOutcome, MoveRecord, configure_match};
pub use grid::{Grid, Speculation};
pub use invariants::{
    AlternatingTurnInvariant, CatalogSoundInvariant, HistoryConsistentInvariant, Invariant,
    InvariantSet, InvariantViolation, MatchInvariants,
};
pub use lines::{Direction, Line, LineCatalog, Tally, generate};
pub use placement::{FreePlacement, GravityDrop, PlacementRule, Variant};
pub use players::{
    Agent, Decision, HeuristicAgent, HumanProxy, MoveSource, ScriptedMoves, Tier, Turn,
    default_name,
};
pub use types::{Cell, Coord, Mark, Slot};
