//! Activity log and console logging.
//!
//! Every completed user action appends one JSON line to
//! `~/.sentimen/events.jsonl` (or `<storage.dir>/events.jsonl`). Writes are
//! best-effort: a failing log never fails the action. `sentimen activity`
//! reads the tail back.
//!
//! Console diagnostics go through the `log` facade with an `env_logger`
//! backend.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Activity entry
// ---------------------------------------------------------------------------

/// How an action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    /// Rejected before any request was made.
    Validation,
    Failure,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Validation => "validation",
            Self::Failure => "failure",
        }
    }
}

/// One line of `events.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub timestamp: String,
    /// Action name, e.g. `"analyze_sentiment"`.
    pub action: String,
    pub outcome: Outcome,
    /// HTTP status of the backend response, when one arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub latency_ms: u64,
    /// The alert shown to the user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ActivityEvent {
    pub fn new(action: &str, outcome: Outcome, started: Instant) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            action: action.to_string(),
            outcome,
            status: None,
            latency_ms: started.elapsed().as_millis() as u64,
            detail: None,
        }
    }

    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

// ---------------------------------------------------------------------------
// Log file
// ---------------------------------------------------------------------------

/// Append-only JSONL activity log. A log without a path records nothing.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    path: Option<PathBuf>,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Log file inside the given data directory.
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join("events.jsonl")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an entry. Best-effort; failures are logged at debug level.
    pub fn record(&self, event: &ActivityEvent) {
        if let Err(e) = self.append(event) {
            log::debug!("activity log write failed: {e:#}");
        }
    }

    fn append(&self, event: &ActivityEvent) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Every readable entry, oldest first. Malformed lines are skipped; a
    /// missing file reads as empty.
    pub fn read_all(&self) -> Vec<ActivityEvent> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<ActivityEvent>(&line).ok())
            .collect()
    }

    /// The last `limit` entries, oldest first.
    pub fn read_recent(&self, limit: usize) -> Vec<ActivityEvent> {
        let mut entries = self.read_all();
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
        entries
    }
}

// ---------------------------------------------------------------------------
// Console logging
// ---------------------------------------------------------------------------

/// Install the `env_logger` backend at `level` (`error`..`trace`, `off`).
///
/// `RUST_LOG` still overrides per module. Calling twice is harmless.
pub fn init_logging(level: &str) {
    let filter = level.parse().unwrap_or(log::LevelFilter::Warn);
    let _ = env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
