//! Plain-text board renderer.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use strictly_align::{Grid, MatchEvent, MatchObserver};
use tracing::warn;

/// Writes the board and match narration to any writer.
#[derive(Debug)]
pub struct TextObserver<W> {
    out: W,
}

impl<W: Write> TextObserver<W> {
    /// Creates an observer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            warn!(error = %e, "Failed to write output");
        }
    }
}

/// A writer shared between the board renderer and the input prompts.
#[derive(Debug, Default)]
pub struct SharedWriter<W>(Rc<RefCell<W>>);

impl<W> SharedWriter<W> {
    /// Wraps `out` for sharing.
    pub fn new(out: W) -> Self {
        Self(Rc::new(RefCell::new(out)))
    }

    /// Returns the writer once every other clone is gone.
    pub fn into_inner(self) -> Option<W> {
        Rc::try_unwrap(self.0).ok().map(RefCell::into_inner)
    }
}

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<W: Write> Write for SharedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

/// Text for one event, or `None` if the event prints nothing.
pub fn describe(event: &MatchEvent) -> Option<String> {
    match event {
        MatchEvent::Started {
            config,
            player_x,
            player_o,
        } => Some(format!(
            "{} (X) vs {} (O) on {}x{}, {} in a row ({})",
            player_x,
            player_o,
            config.rows(),
            config.cols(),
            config.k(),
            config.variant()
        )),
        MatchEvent::MoveMade {
            player,
            mark,
            coord,
            tier,
            ..
        } => Some(match tier {
            Some(tier) => format!("{} ({}) {} at {}", player, mark, tier.describe(), coord),
            None => format!("{} ({}) played {}", player, mark, coord),
        }),
        MatchEvent::MoveRejected { player, reason, .. } => {
            Some(format!("{}: {}, try again", player, reason))
        }
        MatchEvent::GameOver { winner, line } => Some(match (winner, line) {
            (Some((mark, name)), Some(line)) => {
                let cells: Vec<String> = line.iter().map(ToString::to_string).collect();
                format!("{} ({}) wins along {}", name, mark, cells.join(" "))
            }
            (Some((mark, name)), None) => format!("{} ({}) wins", name, mark),
            (None, _) => "It's a draw".to_string(),
        }),
    }
}

impl<W: Write> MatchObserver for TextObserver<W> {
    fn render(&mut self, grid: &Grid) {
        let board = grid.display();
        self.emit(&board);
        self.emit("");
    }

    fn notify(&mut self, event: &MatchEvent) {
        if let Some(text) = describe(event) {
            self.emit(&text);
        }
    }
}
