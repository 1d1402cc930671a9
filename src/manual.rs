//! A person guesses and the scoring authority answers.

use crate::bot::PlayStatus;
use crate::error::{Error, Result};
use crate::host::ScoringAuthority;
use crate::range::Range;
use crate::records::SessionRecord;
use crate::strategy::{GuessRecord, GuessResult};
use crate::{debug_log, info_log};
use chrono::{DateTime, Utc};
use std::io::{BufRead, Write};

/// Why a line of input was not sent to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessInputError {
    NotANumber,
    OutOfBounds,
}

/// Parses one line as a whole-number guess within `bounds`.
pub fn parse_guess(input: &str, bounds: &Range) -> std::result::Result<i64, GuessInputError> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| GuessInputError::NotANumber)?;
    if !bounds.contains(value) {
        return Err(GuessInputError::OutOfBounds);
    }
    Ok(value)
}

/// Hint shown to the player for a host answer.
pub fn feedback_text(result: GuessResult) -> &'static str {
    match result {
        GuessResult::Low => "Higher!",
        GuessResult::High => "Lower!",
        GuessResult::Correct => "Correct!",
    }
}

#[derive(Clone, Debug)]
pub struct ManualReport {
    pub game_id: String,
    pub bounds: Range,
    /// Range still consistent with the answers
    pub range: Range,
    pub history: Vec<GuessRecord>,
    /// Attempts as counted by the host
    pub host_attempts: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ManualReport {
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            game_id: self.game_id.clone(),
            strategy: None,
            status: PlayStatus::Completed,
            abort_reason: None,
            attempts: self.history.len(),
            range: self.bounds,
            history: self.history.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Reads guesses from `reader` and writes prompts and hints to `writer`.
///
/// Only well-formed guesses inside `bounds` reach the host; anything else
/// is answered locally and asked again.
pub struct ManualGame<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    bounds: Range,
}

impl<R: BufRead, W: Write> ManualGame<R, W> {
    pub fn new(reader: R, writer: W, bounds: Range) -> Self {
        Self {
            reader,
            writer,
            bounds,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Creates a game on `authority` and plays it until the number is found.
    ///
    /// Closing the input before then is [`Error::InputClosed`].
    pub fn play<A: ScoringAuthority>(&mut self, mut authority: A) -> Result<ManualReport> {
        let started_at = Utc::now();
        let created = authority.create_game()?;
        info_log!("Manual game {} over {}", created.id, self.bounds);
        writeln!(
            self.writer,
            "Game {}: guess the number in {}.",
            created.id, self.bounds
        )?;

        let mut range = self.bounds;
        let mut history = Vec::new();
        loop {
            let Some(guess) = self.read_guess(&range)? else {
                return Err(Error::InputClosed);
            };
            let receipt = authority.submit_guess(&created.id, guess)?;
            let record = GuessRecord {
                guess,
                result: receipt.result,
            };
            history.push(record);
            range.narrow(&record);
            debug_log!("Manual guess {} -> {}", guess, record.result);

            if record.result == GuessResult::Correct {
                writeln!(
                    self.writer,
                    "{} You found {guess} in {} guesses.",
                    feedback_text(record.result),
                    receipt.attempts
                )?;
                return Ok(ManualReport {
                    game_id: created.id,
                    bounds: self.bounds,
                    range,
                    history,
                    host_attempts: receipt.attempts,
                    started_at,
                    finished_at: Utc::now(),
                });
            }
            writeln!(
                self.writer,
                "{} Attempts: {}. The number is in {range}.",
                feedback_text(record.result),
                receipt.attempts
            )?;
        }
    }

    /// Prompts until a valid guess arrives. `None` on end of input.
    fn read_guess(&mut self, range: &Range) -> Result<Option<i64>> {
        loop {
            write!(self.writer, "Your guess {range}: ")?;
            self.writer.flush()?;

            let mut input = String::new();
            if self.reader.read_line(&mut input)? == 0 {
                return Ok(None);
            }
            match parse_guess(&input, &self.bounds) {
                Ok(guess) => return Ok(Some(guess)),
                Err(GuessInputError::NotANumber) => {
                    writeln!(self.writer, "'{}' is not a whole number.", input.trim())?;
                }
                Err(GuessInputError::OutOfBounds) => {
                    writeln!(
                        self.writer,
                        "Guesses must be between {} and {}.",
                        self.bounds.min, self.bounds.max
                    )?;
                }
            }
        }
    }
}
