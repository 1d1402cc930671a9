//! Search strategies used by the bot to pick its next guess.
//!
//! Every strategy sees the current [`Range`] and the guess history and returns
//! a raw probe. The probe is allowed to be fractional or to fall outside the
//! range; [`GuessBot`](crate::bot::GuessBot) rounds and clamps it before it is
//! submitted.

use crate::range::Range;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 1/φ, the golden-section partition ratio.
const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_75;

/// Feedback from the scoring authority about a single guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessResult {
    /// The guess is below the target
    Low,
    /// The guess is above the target
    High,
    Correct,
}

impl GuessResult {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
            Self::Correct => "correct",
        }
    }
}

impl fmt::Display for GuessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub guess: i64,
    pub result: GuessResult,
}

pub trait GuessStrategy: Send {
    fn name(&self) -> &'static str;

    /// Clears any per-session state before a new game over `range`.
    fn reset(&mut self, range: Range);

    fn pick(&mut self, range: &Range, history: &[GuessRecord]) -> f64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BinarySearch;

impl GuessStrategy for BinarySearch {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn reset(&mut self, _range: Range) {}

    fn pick(&mut self, range: &Range, _history: &[GuessRecord]) -> f64 {
        range.midpoint() as f64
    }
}

/// Uniformly random guess over the remaining range.
#[derive(Debug)]
pub struct RandomSearch {
    rng: StdRng,
}

impl RandomSearch {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of picks for a given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl GuessStrategy for RandomSearch {
    fn name(&self) -> &'static str {
        "random"
    }

    fn reset(&mut self, _range: Range) {}

    fn pick(&mut self, range: &Range, _history: &[GuessRecord]) -> f64 {
        if range.is_inverted() {
            return range.midpoint() as f64;
        }
        self.rng.gen_range(range.min..=range.max) as f64
    }
}

/// Doubles its step away from the lower bound until it overshoots, then
/// finishes the game as a binary search over whatever range is left.
#[derive(Debug)]
pub struct ExponentialSearch {
    step: i64,
    using_binary: bool,
}

impl ExponentialSearch {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: 1,
            using_binary: false,
        }
    }

    #[must_use]
    pub fn is_using_binary(&self) -> bool {
        self.using_binary
    }
}

impl Default for ExponentialSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl GuessStrategy for ExponentialSearch {
    fn name(&self) -> &'static str {
        "exponential"
    }

    fn reset(&mut self, _range: Range) {
        self.step = 1;
        self.using_binary = false;
    }

    fn pick(&mut self, range: &Range, history: &[GuessRecord]) -> f64 {
        if self.using_binary {
            return range.midpoint() as f64;
        }

        match history.last() {
            None
            | Some(GuessRecord {
                result: GuessResult::Low,
                ..
            }) => {
                let guess = range.min.saturating_add(self.step).min(range.max);
                self.step = self.step.saturating_mul(2).min(range.span().max(1));
                guess as f64
            }
            // Overshot: binary search from here on, starting on the current range
            Some(_) => {
                self.using_binary = true;
                range.midpoint() as f64
            }
        }
    }
}

/// Golden-section partition of the range, approximating a Fibonacci search
/// without precomputing the sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FibonacciSearch;

impl GuessStrategy for FibonacciSearch {
    fn name(&self) -> &'static str {
        "fibonacci"
    }

    fn reset(&mut self, _range: Range) {}

    fn pick(&mut self, range: &Range, _history: &[GuessRecord]) -> f64 {
        let span = range.span();
        if span <= 2 {
            return range.midpoint() as f64;
        }
        let offset = (span as f64 * GOLDEN_RATIO_CONJUGATE + 0.5).floor() as i64;
        range
            .min
            .saturating_add(offset)
            .clamp(range.min, range.max) as f64
    }
}

/// Selects one of the built-in strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Binary,
    Random,
    Exponential,
    Fibonacci,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Binary,
        StrategyKind::Random,
        StrategyKind::Exponential,
        StrategyKind::Fibonacci,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Random => "random",
            Self::Exponential => "exponential",
            Self::Fibonacci => "fibonacci",
        }
    }

    /// Builds a fresh strategy instance. `seed` only affects `Random`.
    #[must_use]
    pub fn build(self, seed: Option<u64>) -> Box<dyn GuessStrategy> {
        match self {
            Self::Binary => Box::new(BinarySearch),
            Self::Random => Box::new(seed.map_or_else(RandomSearch::new, RandomSearch::with_seed)),
            Self::Exponential => Box::new(ExponentialSearch::new()),
            Self::Fibonacci => Box::new(FibonacciSearch),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "random" => Ok(Self::Random),
            "exponential" => Ok(Self::Exponential),
            "fibonacci" => Ok(Self::Fibonacci),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}
