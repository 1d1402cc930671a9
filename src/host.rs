//! The scoring authority seam and the JSON shapes a game host speaks.

use crate::error::Result;
use crate::strategy::GuessResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Completed,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// Reply to `POST /games`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGame {
    pub id: String,
    pub status: GameStatus,
    pub attempts: u32,
    pub started_at: DateTime<Utc>,
}

/// Reply to `GET /games/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    pub status: GameStatus,
    pub attempts: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_guess_at: Option<DateTime<Utc>>,
}

/// Body of `POST /games/{id}/guess`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    pub value: i64,
}

/// Reply to `POST /games/{id}/guess`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessReceipt {
    pub result: GuessResult,
    pub status: GameStatus,
    pub attempts: u32,
    pub last_guess_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Whoever holds the secret number and judges guesses.
///
/// Implemented by the in-process [`GameEngine`](crate::engine::GameEngine),
/// the HTTP [`GameHostClient`](crate::client::GameHostClient) and the
/// interactive [`FeedbackPrompt`](crate::cli::FeedbackPrompt). Calls for one
/// game id are expected to arrive sequentially.
pub trait ScoringAuthority {
    fn create_game(&mut self) -> Result<CreatedGame>;

    fn get_game(&mut self, game_id: &str) -> Result<GameSnapshot>;

    fn submit_guess(&mut self, game_id: &str, value: i64) -> Result<GuessReceipt>;
}

impl<A: ScoringAuthority + ?Sized> ScoringAuthority for &mut A {
    fn create_game(&mut self) -> Result<CreatedGame> {
        (**self).create_game()
    }

    fn get_game(&mut self, game_id: &str) -> Result<GameSnapshot> {
        (**self).get_game(game_id)
    }

    fn submit_guess(&mut self, game_id: &str, value: i64) -> Result<GuessReceipt> {
        (**self).submit_guess(game_id, value)
    }
}
