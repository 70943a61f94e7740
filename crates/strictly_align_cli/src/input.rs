//! Terminal move source.
//!
//! Free placement reads `row col`; gravity reads a single column. Indices
//! are zero-based.

use std::cell::RefCell;
use std::io::{BufRead, ErrorKind, Write};
use std::rc::Rc;
use strictly_align::{Grid, InputError, Mark, MoveSource, Slot, Variant};
use tracing::{debug, instrument, warn};

/// Parses one line of user input into a move descriptor.
#[instrument]
pub fn parse_move(line: &str, variant: Variant) -> Result<Slot, InputError> {
    let malformed = || InputError::Malformed(line.trim().to_string());
    let numbers = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<usize>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;

    match (variant, numbers.as_slice()) {
        (Variant::Free, [row, col]) => Ok(Slot::cell(*row, *col)),
        (Variant::Gravity, [col]) => Ok(Slot::Column(*col)),
        _ => Err(malformed()),
    }
}

/// Reads moves line by line from a shared reader, prompting on a writer.
///
/// Both human players share one reader so buffered input is never split
/// between them.
#[derive(Debug)]
pub struct PromptedMoves<R, W> {
    name: String,
    variant: Variant,
    reader: Rc<RefCell<R>>,
    out: W,
}

impl<R: BufRead, W: Write> PromptedMoves<R, W> {
    /// Creates a source for player `name` that prompts on `out`.
    pub fn new(
        name: impl Into<String>,
        variant: Variant,
        reader: Rc<RefCell<R>>,
        out: W,
    ) -> Self {
        Self {
            name: name.into(),
            variant,
            reader,
            out,
        }
    }

    fn prompt(&self, grid: &Grid) -> String {
        match self.variant {
            Variant::Free => format!(
                "{}, enter row (0-{}) and column (0-{}): ",
                self.name,
                grid.rows() - 1,
                grid.cols() - 1
            ),
            Variant::Gravity => {
                format!("{}, enter the column (0-{}): ", self.name, grid.cols() - 1)
            }
        }
    }
}

impl<R: BufRead, W: Write> MoveSource for PromptedMoves<R, W> {
    fn next_move(&mut self, grid: &Grid, mark: Mark) -> Result<Slot, InputError> {
        let prompt = self.prompt(grid);
        if let Err(e) = write!(self.out, "{}", prompt).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write prompt");
        }

        let mut line = String::new();
        let read = match self.reader.borrow_mut().read_line(&mut line) {
            Ok(read) => read,
            // read_line has already consumed the bad line.
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(player = %self.name, error = %e, "Input is not valid UTF-8");
                return Err(InputError::Malformed("<invalid UTF-8>".to_string()));
            }
            Err(e) => {
                warn!(player = %self.name, error = %e, "Failed to read input");
                return Err(InputError::Closed);
            }
        };
        if read == 0 {
            return Err(InputError::Closed);
        }
        debug!(player = %self.name, %mark, input = line.trim(), "Read input");
        parse_move(&line, self.variant)
    }
}
