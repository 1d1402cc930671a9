use crate::error::{Error, Result};
use crate::host::{CreatedGame, GameSnapshot, GameStatus, GuessReceipt, ScoringAuthority};
use crate::range::{DEFAULT_MAX, DEFAULT_MIN};
use crate::strategy::GuessResult;
use crate::{debug_log, info_log};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// One game as the scoring authority sees it.
#[derive(Clone, Debug)]
pub struct Game {
    id: String,
    target_number: i64,
    attempts: u32,
    status: GameStatus,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    last_guess_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn new(target_number: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target_number,
            attempts: 0,
            status: GameStatus::Active,
            started_at: Utc::now(),
            finished_at: None,
            last_guess_at: None,
        }
    }

    /// Game with a target drawn uniformly from `[1, 10000]`.
    pub fn random() -> Self {
        Self::new(rand::thread_rng().gen_range(DEFAULT_MIN..=DEFAULT_MAX))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target_number(&self) -> i64 {
        self.target_number
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn last_guess_at(&self) -> Option<DateTime<Utc>> {
        self.last_guess_at
    }

    /// Judges a guess and records the attempt.
    ///
    /// Every call on an active game counts as a new attempt, including
    /// repeats of an earlier guess. A completed game rejects all guesses.
    pub fn classify(&mut self, guess: i64) -> Result<GuessResult> {
        if self.status == GameStatus::Completed {
            return Err(Error::GameCompleted(self.id.clone()));
        }

        let result = match guess.cmp(&self.target_number) {
            Ordering::Less => GuessResult::Low,
            Ordering::Greater => GuessResult::High,
            Ordering::Equal => GuessResult::Correct,
        };

        let now = Utc::now();
        self.attempts += 1;
        self.last_guess_at = Some(now);
        if result == GuessResult::Correct {
            self.status = GameStatus::Completed;
            self.finished_at = Some(now);
        }
        Ok(result)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id.clone(),
            status: self.status,
            attempts: self.attempts,
            started_at: self.started_at,
            finished_at: self.finished_at,
            last_guess_at: self.last_guess_at,
        }
    }
}

/// In-process scoring authority holding any number of games.
#[derive(Debug, Default)]
pub struct GameEngine {
    games: HashMap<String, Game>,
    /// Target for the next `create_game` call through [`ScoringAuthority`].
    next_target: Option<i64>,
}

impl GameEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose next created game uses `target` instead of a random one.
    pub fn with_target(target: i64) -> Self {
        Self {
            games: HashMap::new(),
            next_target: Some(target),
        }
    }

    /// Registers a new game, drawing a random target when none is given.
    pub fn create(&mut self, target_number: Option<i64>) -> &Game {
        let game = target_number.map_or_else(Game::random, Game::new);
        info_log!("Created game {}", game.id);
        let id = game.id.clone();
        self.games.entry(id).or_insert(game)
    }

    pub fn game(&self, game_id: &str) -> Result<&Game> {
        self.games
            .get(game_id)
            .ok_or_else(|| Error::GameNotFound(game_id.to_string()))
    }

    pub fn classify(&mut self, game_id: &str, guess: i64) -> Result<GuessResult> {
        let game = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| Error::GameNotFound(game_id.to_string()))?;
        let result = game.classify(guess)?;
        debug_log!("Game {} guess {} -> {}", game_id, guess, result);
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl ScoringAuthority for GameEngine {
    fn create_game(&mut self) -> Result<CreatedGame> {
        let target = self.next_target.take();
        let game = self.create(target);
        Ok(CreatedGame {
            id: game.id.clone(),
            status: game.status,
            attempts: game.attempts,
            started_at: game.started_at,
        })
    }

    fn get_game(&mut self, game_id: &str) -> Result<GameSnapshot> {
        Ok(self.game(game_id)?.snapshot())
    }

    fn submit_guess(&mut self, game_id: &str, value: i64) -> Result<GuessReceipt> {
        let result = self.classify(game_id, value)?;
        let game = self.game(game_id)?;
        Ok(GuessReceipt {
            result,
            status: game.status,
            attempts: game.attempts,
            last_guess_at: game.last_guess_at.unwrap_or_else(Utc::now),
            finished_at: game.finished_at,
        })
    }
}
