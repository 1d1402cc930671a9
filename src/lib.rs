// Library interface for guess-number
// The binary and the integration tests both build on these modules

pub mod bench;
pub mod bot;
pub mod cli;
pub mod client;
pub mod engine;
pub mod error;
pub mod host;
pub mod logging;
pub mod manual;
pub mod range;
pub mod records;
pub mod session;
pub mod strategy;
pub mod tui;

// Re-export commonly used items for easier testing
pub use bot::{AbortReason, BotOptions, GuessBot, PlayResult, PlayStatus};
pub use engine::{Game, GameEngine};
pub use error::{Error, Result};
pub use host::{GameStatus, ScoringAuthority};
pub use range::Range;
pub use session::{SessionOptions, SessionReport, SessionView, run_session};
pub use strategy::{
    BinarySearch, ExponentialSearch, FibonacciSearch, GuessRecord, GuessResult, GuessStrategy,
    RandomSearch, StrategyKind,
};
