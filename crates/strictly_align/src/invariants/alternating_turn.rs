//! Marks alternate X, O, X, O, ...

use super::Invariant;
use crate::game::{Match, MatchState};
use crate::types::Mark;

/// Move history alternates starting with X, and while the match is live
/// the mark to move follows the last mover.
pub struct AlternatingTurnInvariant;

impl Invariant<Match> for AlternatingTurnInvariant {
    fn holds(game: &Match) -> bool {
        let history = game.history();

        if history.first().is_some_and(|first| first.mark != Mark::X) {
            return false;
        }
        if history.windows(2).any(|pair| pair[0].mark == pair[1].mark) {
            return false;
        }

        match game.state() {
            MatchState::AwaitingMove(mark) => {
                let expected = if history.len() % 2 == 0 { Mark::X } else { Mark::O };
                mark == expected
            }
            MatchState::WinDeclared(mark) => history.last().is_some_and(|last| last.mark == mark),
            MatchState::DrawDeclared => true,
        }
    }

    fn description() -> &'static str {
        "Marks alternate turns (X, O, X, O, ...)"
    }
}
