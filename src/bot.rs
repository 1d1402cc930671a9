//! The guessing bot: drives one game to completion against a scoring
//! authority using a [`GuessStrategy`].
//!
//! # State Machine
//! A play session is `running` until it reaches one of two terminal states:
//! - `Completed`: the authority answered `correct`
//! - `Aborted`: the attempt budget ran out, or feedback contradicted itself
//!   and the range inverted
//!
//! Errors from the authority are not folded into `Aborted`; they propagate
//! out of [`GuessBot::play`] untouched and no guess is retried.

use crate::debug_log;
use crate::error::Result;
use crate::host::ScoringAuthority;
use crate::range::Range;
use crate::strategy::{GuessRecord, GuessResult, GuessStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MAX_ATTEMPTS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BotOptions {
    pub initial_range: Range,
    pub max_attempts: usize,
}

impl Default for BotOptions {
    fn default() -> Self {
        Self {
            initial_range: Range::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayStatus {
    Completed,
    Aborted,
}

impl fmt::Display for PlayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    AttemptsExhausted,
    /// Feedback left no integer that could be the target
    RangeInverted,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttemptsExhausted => f.write_str("attempt limit reached"),
            Self::RangeInverted => f.write_str("contradictory feedback"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayResult {
    pub attempts: usize,
    pub history: Vec<GuessRecord>,
    pub status: PlayStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<AbortReason>,
}

pub struct GuessBot<A> {
    authority: A,
    strategy: Box<dyn GuessStrategy>,
    options: BotOptions,
    range: Range,
    history: Vec<GuessRecord>,
}

impl<A: ScoringAuthority> GuessBot<A> {
    pub fn new(authority: A, mut strategy: Box<dyn GuessStrategy>, options: BotOptions) -> Self {
        strategy.reset(options.initial_range);
        Self {
            authority,
            strategy,
            options,
            range: options.initial_range,
            history: Vec::new(),
        }
    }

    pub fn play(&mut self, game_id: &str) -> Result<PlayResult> {
        self.play_with(game_id, |_, _| {})
    }

    /// Plays one game, calling `on_step` after every guess once the range has
    /// been narrowed with its feedback.
    ///
    /// Each iteration makes exactly one `submit_guess` call and there are at
    /// most `max_attempts` of them.
    pub fn play_with<F>(&mut self, game_id: &str, mut on_step: F) -> Result<PlayResult>
    where
        F: FnMut(&GuessRecord, &Range),
    {
        self.range = self.options.initial_range;
        self.strategy.reset(self.range);
        self.history.clear();

        // Options built by hand can skip `Range::new`; nothing can be guessed
        if self.range.is_inverted() {
            debug_log!("Game {game_id}: initial range {} is inverted", self.range);
            return Ok(self.finish(PlayStatus::Aborted, Some(AbortReason::RangeInverted)));
        }

        for _ in 0..self.options.max_attempts {
            let raw = self.strategy.pick(&self.range, &self.history);
            let guess = self.range.sanitize(raw);
            let receipt = self.authority.submit_guess(game_id, guess)?;

            let record = GuessRecord {
                guess,
                result: receipt.result,
            };
            self.history.push(record);
            self.range.narrow(&record);
            debug_log!(
                "{} guess #{}: {} -> {} (range now {})",
                self.strategy.name(),
                self.history.len(),
                guess,
                record.result,
                self.range
            );

            on_step(&record, &self.range);

            if record.result == GuessResult::Correct {
                return Ok(self.finish(PlayStatus::Completed, None));
            }
            if self.range.is_inverted() {
                debug_log!(
                    "Game {game_id}: range inverted to {} after {} guesses, aborting",
                    self.range,
                    self.history.len()
                );
                return Ok(self.finish(PlayStatus::Aborted, Some(AbortReason::RangeInverted)));
            }
        }

        debug_log!(
            "Game {game_id}: no answer after {} guesses, aborting",
            self.history.len()
        );
        Ok(self.finish(PlayStatus::Aborted, Some(AbortReason::AttemptsExhausted)))
    }

    fn finish(&self, status: PlayStatus, abort_reason: Option<AbortReason>) -> PlayResult {
        PlayResult {
            attempts: self.history.len(),
            history: self.history.clone(),
            status,
            abort_reason,
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn options(&self) -> BotOptions {
        self.options
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }

    pub fn into_authority(self) -> A {
        self.authority
    }
}
