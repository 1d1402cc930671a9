use crate::bot::{AbortReason, PlayStatus};
use crate::error::Result;
use crate::range::Range;
use crate::strategy::{GuessRecord, StrategyKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "guess-number";
const RECORDS_FILE: &str = "sessions.jsonl";
/// Summary key for sessions a person played
pub const MANUAL_KEY: &str = "manual";

/// One finished session, as saved to disk. `strategy` is `None` when a
/// person made the guesses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub game_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
    pub status: PlayStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<AbortReason>,
    pub attempts: usize,
    pub range: Range,
    pub history: Vec<GuessRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategySummary {
    pub games: usize,
    pub completed: usize,
    pub aborted: usize,
    /// Aborts caused by feedback that ruled out every number
    pub contradictory: usize,
    /// Mean attempts over completed games only
    pub mean_attempts: Option<f64>,
}

/// `<data dir>/guess-number/sessions.jsonl`, if the platform has a data dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(RECORDS_FILE))
}

pub fn append(path: &Path, record: &SessionRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(record)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Reads every saved record. A missing file means no sessions yet.
pub fn load(path: &Path) -> Result<Vec<SessionRecord>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

pub fn summarize(records: &[SessionRecord]) -> BTreeMap<String, StrategySummary> {
    let mut summaries: BTreeMap<String, StrategySummary> = BTreeMap::new();
    let mut totals: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let key = record
            .strategy
            .map_or(MANUAL_KEY, StrategyKind::as_str)
            .to_string();
        let summary = summaries.entry(key.clone()).or_default();
        summary.games += 1;
        match record.status {
            PlayStatus::Completed => {
                summary.completed += 1;
                *totals.entry(key).or_insert(0) += record.attempts;
            }
            PlayStatus::Aborted => {
                summary.aborted += 1;
                if record.abort_reason == Some(AbortReason::RangeInverted) {
                    summary.contradictory += 1;
                }
            }
        }
    }

    for (key, summary) in &mut summaries {
        if summary.completed > 0 {
            let total = totals.get(key).copied().unwrap_or(0);
            summary.mean_attempts = Some(total as f64 / summary.completed as f64);
        }
    }
    summaries
}
