//! Match orchestration between two agents.
//!
//! The controller is the only component that talks to the outside world:
//! it asks the active agent for a move, pushes it through the match
//! pipeline and reports every state change to an observer.

use crate::error::{InputError, MatchError, MoveError};
use crate::game::{Match, MatchConfig, MatchState, MoveOutcome};
use crate::grid::Grid;
use crate::players::{Agent, Tier};
use crate::types::{Coord, Mark, Slot};
use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Notifications sent from the controller to its observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchEvent {
    /// A fresh match is about to start.
    Started {
        /// Board shape and rules.
        config: MatchConfig,
        /// Name playing X.
        player_x: String,
        /// Name playing O.
        player_o: String,
    },
    /// A move was applied.
    MoveMade {
        /// Mover's name.
        player: String,
        /// Mover's mark.
        mark: Mark,
        /// What was requested.
        slot: Slot,
        /// Where the mark landed.
        coord: Coord,
        /// Tier behind an automated move.
        tier: Option<Tier>,
    },
    /// Human input was rejected; the same player will be asked again.
    MoveRejected {
        /// Player whose input was rejected.
        player: String,
        /// Player's mark.
        mark: Mark,
        /// Why it was rejected.
        reason: String,
    },
    /// The match ended.
    GameOver {
        /// Winning mark and name, `None` for a draw.
        winner: Option<(Mark, String)>,
        /// Cells of the completed line.
        line: Option<Vec<Coord>>,
    },
}

/// Receives board renders and match events.
pub trait MatchObserver {
    /// Called after every state change with the current grid.
    fn render(&mut self, grid: &Grid);

    /// Called for every match event.
    fn notify(&mut self, _event: &MatchEvent) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl MatchObserver for NullObserver {
    fn render(&mut self, _grid: &Grid) {}
}

/// Drives a match between two agents.
#[derive(Getters)]
pub struct MatchController {
    /// The match being played.
    game: Match,
    /// Agent playing X.
    player_x: Box<dyn Agent>,
    /// Agent playing O.
    player_o: Box<dyn Agent>,
    #[getter(skip)]
    observer: Box<dyn MatchObserver>,
    #[getter(skip)]
    announced: bool,
}

impl std::fmt::Debug for MatchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchController")
            .field("game", &self.game)
            .field("player_x", &self.player_x.name())
            .field("player_o", &self.player_o.name())
            .finish_non_exhaustive()
    }
}

impl MatchController {
    /// Creates a controller; X moves first.
    #[instrument(skip_all, fields(player_x = player_x.name(), player_o = player_o.name()))]
    pub fn new(
        game: Match,
        player_x: Box<dyn Agent>,
        player_o: Box<dyn Agent>,
        observer: Box<dyn MatchObserver>,
    ) -> Self {
        Self {
            game,
            player_x,
            player_o,
            observer,
            announced: false,
        }
    }

    /// Name of the player holding `mark`.
    pub fn name_of(&self, mark: Mark) -> &str {
        match mark {
            Mark::X => self.player_x.name(),
            Mark::O => self.player_o.name(),
        }
    }

    fn announce(&mut self) {
        if self.announced {
            return;
        }
        self.announced = true;
        let event = MatchEvent::Started {
            config: *self.game.config(),
            player_x: self.player_x.name().to_string(),
            player_o: self.player_o.name().to_string(),
        };
        self.observer.notify(&event);
        self.observer.render(self.game.grid());
    }

    /// Plays one move for the mark to move.
    ///
    /// Rejected human input is reported and asked for again until a legal
    /// move arrives. An illegal move from an automated agent ends the run.
    #[instrument(skip(self), fields(to_move = ?self.game.to_move()))]
    pub fn step(&mut self) -> Result<MoveOutcome, MatchError> {
        self.announce();

        loop {
            let Some(mut turn) = self.game.turn() else {
                return Err(MatchError::Move(MoveError::GameOver));
            };
            let mark = turn.mark;
            let agent = match mark {
                Mark::X => &mut self.player_x,
                Mark::O => &mut self.player_o,
            };

            debug!(player = agent.name(), %mark, "Requesting move");
            let decision = match agent.choose_move(&mut turn) {
                Ok(decision) => decision,
                Err(MatchError::Input(InputError::Malformed(text)))
                    if agent.retries_illegal_moves() =>
                {
                    warn!(player = agent.name(), input = %text, "Malformed input");
                    self.observer.notify(&MatchEvent::MoveRejected {
                        player: agent.name().to_string(),
                        mark,
                        reason: InputError::Malformed(text).to_string(),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            let outcome = match self.game.apply_move(decision.slot) {
                Ok(outcome) => outcome,
                Err(err) if agent.retries_illegal_moves() => {
                    warn!(player = agent.name(), slot = %decision.slot, error = %err, "Illegal move");
                    self.observer.notify(&MatchEvent::MoveRejected {
                        player: agent.name().to_string(),
                        mark,
                        reason: err.to_string(),
                    });
                    self.observer.render(self.game.grid());
                    continue;
                }
                Err(source) => return Err(MatchError::AgentMove { mark, source }),
            };

            let coord = self
                .game
                .history()
                .last()
                .map(|record| record.coord)
                .ok_or(MatchError::Move(MoveError::GameOver))?;
            info!(player = agent.name(), %mark, %coord, "Move made");
            self.observer.notify(&MatchEvent::MoveMade {
                player: agent.name().to_string(),
                mark,
                slot: decision.slot,
                coord,
                tier: decision.tier,
            });
            self.observer.render(self.game.grid());

            if outcome != MoveOutcome::Continue {
                self.report_game_over(outcome);
            }
            return Ok(outcome);
        }
    }

    fn report_game_over(&mut self, outcome: MoveOutcome) {
        let winner = match outcome {
            MoveOutcome::WinDeclared(mark) => Some((mark, self.name_of(mark).to_string())),
            _ => None,
        };
        let line = self.game.winning_line().map(|line| line.cells().to_vec());
        match &winner {
            Some((mark, name)) => info!(%mark, %name, "Game over: winner"),
            None => info!("Game over: draw"),
        }
        self.observer.notify(&MatchEvent::GameOver { winner, line });
    }

    /// Plays until the match ends and returns the terminal state.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> Result<MatchState, MatchError> {
        info!("Starting match");
        while !self.game.state().is_terminal() {
            self.step()?;
        }
        Ok(self.game.state())
    }

    /// Clears the board for another match between the same players.
    #[instrument(skip(self))]
    pub fn rematch(&mut self) {
        self.game.restart();
        self.announced = false;
    }
}
