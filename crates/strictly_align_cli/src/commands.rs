//! Runners behind each subcommand.

use crate::input::PromptedMoves;
use crate::render::{SharedWriter, TextObserver};
use crate::settings::Settings;
use derive_getters::Getters;
use derive_more::Display;
use serde::Serialize;
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use strictly_align::{
    Agent, Direction, HeuristicAgent, HumanProxy, Mark, Match, MatchController, MatchError,
    MatchState, NullObserver, default_name, generate,
};
use strum::IntoEnumIterator;
use tracing::{info, instrument};

/// Builds the heuristic agent for `mark`.
///
/// With a seed, X uses it as is and O uses the next value, so the two
/// agents never mirror each other.
pub fn computer_agent(settings: &Settings, mark: Mark) -> HeuristicAgent {
    let name = display_name(settings, mark, false);
    let agent = match settings.seed() {
        Some(seed) => {
            let offset = match mark {
                Mark::X => 0,
                Mark::O => 1,
            };
            HeuristicAgent::seeded(name, seed.wrapping_add(offset))
        }
        None => HeuristicAgent::new(name),
    };
    match settings.fork_tiers() {
        Some(enabled) => agent.with_fork_tiers(*enabled),
        None => agent,
    }
}

fn display_name(settings: &Settings, mark: Mark, human: bool) -> String {
    let configured = match mark {
        Mark::X => settings.name_x(),
        Mark::O => settings.name_o(),
    };
    configured
        .clone()
        .unwrap_or_else(|| default_name(human, mark))
}

fn agent_for<R, W>(
    settings: &Settings,
    mark: Mark,
    reader: &Rc<RefCell<R>>,
    out: &SharedWriter<W>,
) -> Box<dyn Agent>
where
    R: BufRead + 'static,
    W: Write + 'static,
{
    let kind = match mark {
        Mark::X => *settings.player_x(),
        Mark::O => *settings.player_o(),
    };
    if kind.is_human() {
        let name = display_name(settings, mark, true);
        let source = PromptedMoves::new(
            name.clone(),
            *settings.variant(),
            reader.clone(),
            out.clone(),
        );
        Box::new(HumanProxy::new(name, source))
    } else {
        Box::new(computer_agent(settings, mark))
    }
}

/// Plays one match plus `rematches` more, returning each final state.
#[instrument(skip(settings, reader, out))]
pub fn play<R, W>(
    settings: &Settings,
    rematches: u32,
    reader: Rc<RefCell<R>>,
    out: W,
) -> anyhow::Result<Vec<MatchState>>
where
    R: BufRead + 'static,
    W: Write + 'static,
{
    let config = settings.match_config()?;
    let out = SharedWriter::new(out);
    let mut controller = MatchController::new(
        Match::new(config),
        agent_for(settings, Mark::X, &reader, &out),
        agent_for(settings, Mark::O, &reader, &out),
        Box::new(TextObserver::new(out.clone())),
    );

    let mut results = Vec::new();
    for round in 0..=rematches {
        if round > 0 {
            controller.rematch();
        }
        let state = controller.run()?;
        info!(round, ?state, "Match finished");
        results.push(state);
    }
    Ok(results)
}

/// Win/draw tally over a batch of computer matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Display)]
#[display("{games} games: X won {x_wins}, O won {o_wins}, {draws} drawn")]
pub struct SimulationSummary {
    /// Matches played.
    games: u32,
    /// Matches won by X.
    x_wins: u32,
    /// Matches won by O.
    o_wins: u32,
    /// Drawn matches.
    draws: u32,
}

/// Plays `games` computer-vs-computer matches.
#[instrument(skip(settings))]
pub fn simulate(settings: &Settings, games: u32) -> anyhow::Result<SimulationSummary> {
    let config = settings.match_config()?;
    let mut controller = MatchController::new(
        Match::new(config),
        Box::new(computer_agent(settings, Mark::X)),
        Box::new(computer_agent(settings, Mark::O)),
        Box::new(NullObserver),
    );

    let mut summary = SimulationSummary::default();
    for round in 0..games {
        if round > 0 {
            controller.rematch();
        }
        match controller.run()? {
            MatchState::WinDeclared(Mark::X) => summary.x_wins += 1,
            MatchState::WinDeclared(Mark::O) => summary.o_wins += 1,
            MatchState::DrawDeclared => summary.draws += 1,
            MatchState::AwaitingMove(mark) => {
                return Err(MatchError::NoMoveAvailable(mark).into());
            }
        }
        summary.games += 1;
    }
    info!(%summary, "Simulation complete");
    Ok(summary)
}

/// Line counts for one board shape.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct LineSummary {
    /// Rows.
    rows: usize,
    /// Columns.
    cols: usize,
    /// Marks to align.
    k: usize,
    /// Every line on the board.
    total: usize,
    /// Lines per direction.
    by_direction: Vec<(Direction, usize)>,
}

impl std::fmt::Display for LineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}x{} board, {} in a row: {} lines",
            self.rows, self.cols, self.k, self.total
        )?;
        for (direction, count) in &self.by_direction {
            writeln!(f, "  {:<13} {}", direction.to_string(), count)?;
        }
        Ok(())
    }
}

/// Counts the lines of a `rows`×`cols` board.
#[instrument]
pub fn lines(rows: usize, cols: usize, k: usize) -> LineSummary {
    let all = generate(rows, cols, k);
    let by_direction = Direction::iter()
        .map(|direction| {
            let count = all.iter().filter(|l| l.direction() == direction).count();
            (direction, count)
        })
        .collect();
    LineSummary {
        rows,
        cols,
        k,
        total: all.len(),
        by_direction,
    }
}
