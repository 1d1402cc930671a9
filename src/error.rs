//! Error types for guess-number.

use thiserror::Error;

/// Errors raised by the engine, the host client and the command-line layers.
///
/// Range inversion and running out of attempts are not errors: they end a
/// play session as [`PlayStatus::Aborted`](crate::bot::PlayStatus::Aborted).
#[derive(Error, Debug)]
pub enum Error {
    /// A guess was submitted to a game that has already been won
    #[error("Game '{0}' is already completed")]
    GameCompleted(String),

    #[error("Game '{0}' not found")]
    GameNotFound(String),

    /// A range was constructed with `min > max`
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },

    /// The game host answered with a non-success status
    #[error("Game host request failed{}: {message}", status_suffix(.status))]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// Transport failure talking to the game host
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The interactive player closed standard input before the game ended
    #[error("Input closed before the game finished")]
    InputClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates an Api error
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}
