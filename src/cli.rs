use crate::bench::BenchReport;
use crate::bot::{BotOptions, DEFAULT_MAX_ATTEMPTS, PlayStatus};
use crate::error::{Error, Result};
use crate::host::{CreatedGame, GameSnapshot, GameStatus, GuessReceipt, ScoringAuthority};
use crate::range::{DEFAULT_MAX, DEFAULT_MIN, Range};
use crate::records::StrategySummary;
use crate::session::{SessionInfo, SessionOptions, SessionReport, SessionView};
use crate::strategy::{GuessRecord, GuessResult, StrategyKind};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Guess-the-number bot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Session records file (defaults to the user data directory)
    #[arg(long = "records", global = true)]
    pub records_path: Option<PathBuf>,

    /// Do not save finished sessions
    #[arg(long, global = true)]
    pub no_save: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Let the bot play against an in-process host
    Play {
        #[command(flatten)]
        bot: BotArgs,

        /// Secret number (random within the range when omitted)
        #[arg(long)]
        target: Option<i64>,

        /// Watch the game in a terminal UI
        #[arg(long)]
        tui: bool,

        /// Pause between guesses in the terminal UI
        #[arg(long, default_value_t = 400)]
        delay_ms: u64,
    },
    /// Let the bot play against a remote game host
    Remote {
        #[command(flatten)]
        bot: BotArgs,

        /// Base URL of the game host
        #[arg(long, env = "GAME_HOST")]
        host: Option<String>,

        /// Bearer token presented to the game host
        #[arg(long, env = "GAME_HOST_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,
    },
    /// Guess the number yourself against an in-process or remote host
    Manual {
        /// Secret number for the in-process host (random when omitted)
        #[arg(long, conflicts_with = "host")]
        target: Option<i64>,

        /// Play against this game host instead of an in-process one
        #[arg(long)]
        host: Option<String>,

        /// Bearer token presented to the game host
        #[arg(long, env = "GAME_HOST_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,
    },
    /// Think of a number and tell the bot whether each guess is low or high
    Assist {
        #[command(flatten)]
        bot: BotArgs,
    },
    /// Play many local games and report attempt statistics
    Bench {
        #[command(flatten)]
        bot: BotArgs,

        #[arg(long, default_value_t = 1_000)]
        rounds: usize,

        /// Benchmark every strategy instead of only --strategy
        #[arg(long)]
        all: bool,
    },
    /// Summarize saved sessions
    History,
}

#[derive(Args, Debug, Clone)]
pub struct BotArgs {
    #[arg(short, long, value_enum, default_value_t = StrategyKind::Binary)]
    pub strategy: StrategyKind,

    #[arg(long, default_value_t = DEFAULT_MIN, allow_negative_numbers = true)]
    pub min: i64,

    #[arg(long, default_value_t = DEFAULT_MAX, allow_negative_numbers = true)]
    pub max: i64,

    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Seed for reproducible random runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl BotArgs {
    pub fn bot_options(&self) -> Result<BotOptions> {
        Ok(BotOptions {
            initial_range: Range::new(self.min, self.max)?,
            max_attempts: self.max_attempts,
        })
    }

    pub fn session_options(&self) -> Result<SessionOptions> {
        Ok(SessionOptions {
            strategy: self.strategy,
            bot: self.bot_options()?,
            seed: self.seed,
        })
    }
}

impl Cli {
    /// True when the command draws a full-screen terminal UI.
    pub fn uses_tui(&self) -> bool {
        matches!(self.command, Command::Play { tui: true, .. })
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// Interactive feedback

/// Parses a player's answer to "is this your number?".
pub fn parse_feedback(input: &str) -> Option<GuessResult> {
    match input.trim().to_lowercase().as_str() {
        "l" | "low" => Some(GuessResult::Low),
        "h" | "high" => Some(GuessResult::High),
        "c" | "correct" | "y" | "yes" => Some(GuessResult::Correct),
        _ => None,
    }
}

/// Scoring authority played by a person at the terminal.
///
/// The person keeps the secret number; each guess is written to `writer` and
/// the verdict read from `reader`, re-asking until the answer parses.
pub struct FeedbackPrompt<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    game_id: String,
    attempts: u32,
    status: GameStatus,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    last_guess_at: Option<DateTime<Utc>>,
}

impl<R: BufRead, W: Write> FeedbackPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            game_id: "interactive".to_string(),
            attempts: 0,
            status: GameStatus::Active,
            started_at: Utc::now(),
            finished_at: None,
            last_guess_at: None,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_feedback(&mut self, value: i64) -> Result<GuessResult> {
        loop {
            write!(
                self.writer,
                "My guess is {value}. Is it (l)ow, (h)igh or (c)orrect? "
            )?;
            self.writer.flush()?;

            let mut input = String::new();
            if self.reader.read_line(&mut input)? == 0 {
                return Err(Error::InputClosed);
            }
            if let Some(result) = parse_feedback(&input) {
                return Ok(result);
            }
            log::warn!("Unrecognized feedback '{}'", input.trim());
            writeln!(self.writer, "Please answer l, h or c.")?;
        }
    }

    fn check_game(&self, game_id: &str) -> Result<()> {
        if game_id != self.game_id {
            return Err(Error::GameNotFound(game_id.to_string()));
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> ScoringAuthority for FeedbackPrompt<R, W> {
    fn create_game(&mut self) -> Result<CreatedGame> {
        self.attempts = 0;
        self.status = GameStatus::Active;
        self.started_at = Utc::now();
        self.finished_at = None;
        self.last_guess_at = None;
        Ok(CreatedGame {
            id: self.game_id.clone(),
            status: self.status,
            attempts: self.attempts,
            started_at: self.started_at,
        })
    }

    fn get_game(&mut self, game_id: &str) -> Result<GameSnapshot> {
        self.check_game(game_id)?;
        Ok(GameSnapshot {
            id: self.game_id.clone(),
            status: self.status,
            attempts: self.attempts,
            started_at: self.started_at,
            finished_at: self.finished_at,
            last_guess_at: self.last_guess_at,
        })
    }

    fn submit_guess(&mut self, game_id: &str, value: i64) -> Result<GuessReceipt> {
        self.check_game(game_id)?;
        if self.status == GameStatus::Completed {
            return Err(Error::GameCompleted(self.game_id.clone()));
        }

        let result = self.read_feedback(value)?;
        let now = Utc::now();
        self.attempts += 1;
        self.last_guess_at = Some(now);
        if result == GuessResult::Correct {
            self.status = GameStatus::Completed;
            self.finished_at = Some(now);
        }
        Ok(GuessReceipt {
            result,
            status: self.status,
            attempts: self.attempts,
            last_guess_at: now,
            finished_at: self.finished_at,
        })
    }
}

// Console output

pub fn display_session_started(info: &SessionInfo) {
    println!(
        "Game {}: {} search over {} (max {} guesses)",
        info.game_id, info.strategy, info.range, info.max_attempts
    );
}

pub fn display_step(record: &GuessRecord, range: &Range) {
    match record.result {
        GuessResult::Correct => println!("  {:>6}  correct", record.guess),
        result if range.is_inverted() => {
            println!("  {:>6}  {:<7}  no numbers left", record.guess, result);
        }
        result => println!(
            "  {:>6}  {:<7}  range {} ({} left)",
            record.guess,
            result,
            range,
            range.len()
        ),
    }
}

pub fn display_report(report: &SessionReport) {
    match report.result.status {
        PlayStatus::Completed => {
            let guess = report.result.history.last().map_or(0, |r| r.guess);
            println!("Found {guess} in {} guesses.", report.result.attempts);
        }
        PlayStatus::Aborted => {
            let reason = report
                .result
                .abort_reason
                .map_or_else(|| "aborted".to_string(), |r| r.to_string());
            println!(
                "Gave up after {} guesses: {reason}.",
                report.result.attempts
            );
        }
    }
    if report.host_game.attempts as usize != report.result.attempts {
        println!(
            "Note: the host counted {} attempts.",
            report.host_game.attempts
        );
    }
}

pub fn display_bench(reports: &[BenchReport]) {
    println!(
        "{:<12} {:>7} {:>9} {:>7} {:>5} {:>5} {:>7}",
        "strategy", "rounds", "completed", "aborted", "min", "max", "mean"
    );
    for r in reports {
        println!(
            "{:<12} {:>7} {:>9} {:>7} {:>5} {:>5} {:>7.2}",
            r.strategy, r.rounds, r.completed, r.aborted, r.min_attempts, r.max_attempts, r.mean_attempts
        );
    }
}

pub fn display_history(summaries: &BTreeMap<String, StrategySummary>) {
    if summaries.is_empty() {
        println!("No saved sessions.");
        return;
    }
    println!(
        "{:<12} {:>6} {:>9} {:>7} {:>13} {:>7}",
        "strategy", "games", "completed", "aborted", "contradictory", "mean"
    );
    for (strategy, s) in summaries {
        let mean = s
            .mean_attempts
            .map_or_else(|| "-".to_string(), |m| format!("{m:.2}"));
        println!(
            "{:<12} {:>6} {:>9} {:>7} {:>13} {:>7}",
            strategy, s.games, s.completed, s.aborted, s.contradictory, mean
        );
    }
}

/// Prints session progress to standard output.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl SessionView for ConsoleView {
    fn session_started(&mut self, info: &SessionInfo) {
        display_session_started(info);
    }

    fn step(&mut self, record: &GuessRecord, range: &Range) {
        display_step(record, range);
    }

    fn finished(&mut self, report: &SessionReport) {
        display_report(report);
    }
}
