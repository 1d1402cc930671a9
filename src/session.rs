//! Runs a complete bot game against a scoring authority: create the game,
//! play it, and collect everything worth showing or saving afterwards.

use crate::bot::{BotOptions, GuessBot, PlayResult, PlayStatus};
use crate::error::Result;
use crate::host::{GameSnapshot, ScoringAuthority};
use crate::info_log;
use crate::range::Range;
use crate::records::SessionRecord;
use crate::strategy::{GuessRecord, StrategyKind};
use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub strategy: StrategyKind,
    pub bot: BotOptions,
    /// Seed for the random strategy
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Binary,
            bot: BotOptions::default(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionInfo {
    pub game_id: String,
    pub strategy: StrategyKind,
    pub range: Range,
    pub max_attempts: usize,
}

#[derive(Clone, Debug)]
pub struct SessionReport {
    pub info: SessionInfo,
    pub result: PlayResult,
    /// The authority's view of the game once play stopped
    pub host_game: GameSnapshot,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionReport {
    pub fn is_completed(&self) -> bool {
        self.result.status == PlayStatus::Completed
    }

    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            game_id: self.info.game_id.clone(),
            strategy: Some(self.info.strategy),
            status: self.result.status,
            abort_reason: self.result.abort_reason,
            attempts: self.result.attempts,
            range: self.info.range,
            history: self.result.history.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Where a running session reports its progress.
pub trait SessionView {
    fn session_started(&mut self, info: &SessionInfo);

    fn step(&mut self, record: &GuessRecord, range: &Range);

    fn finished(&mut self, report: &SessionReport);
}

/// Discards every update.
#[derive(Debug, Default)]
pub struct NullView;

impl SessionView for NullView {
    fn session_started(&mut self, _info: &SessionInfo) {}

    fn step(&mut self, _record: &GuessRecord, _range: &Range) {}

    fn finished(&mut self, _report: &SessionReport) {}
}

pub fn run_session<A: ScoringAuthority>(
    mut authority: A,
    options: &SessionOptions,
    view: &mut dyn SessionView,
) -> Result<SessionReport> {
    let created = authority.create_game()?;
    let info = SessionInfo {
        game_id: created.id.clone(),
        strategy: options.strategy,
        range: options.bot.initial_range,
        max_attempts: options.bot.max_attempts,
    };
    info_log!(
        "Session for game {} with {} over {}",
        info.game_id,
        info.strategy,
        info.range
    );
    view.session_started(&info);

    let mut bot = GuessBot::new(
        &mut authority,
        options.strategy.build(options.seed),
        options.bot,
    );
    let result = bot.play_with(&created.id, |record, range| view.step(record, range))?;
    drop(bot);

    let host_game = authority.get_game(&created.id)?;
    let report = SessionReport {
        info,
        result,
        host_game,
        started_at: created.started_at,
        finished_at: Utc::now(),
    };
    view.finished(&report);
    Ok(report)
}
