//! Session history persistence.
//!
//! Each finished round produces one [`SessionSummary`]; recorders keep the
//! most recent [`HISTORY_LIMIT`] per game, newest first. The file-backed
//! recorder writes JSON under the platform data directory.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::AppDirs;

/// Most recent summaries kept per game.
pub const HISTORY_LIMIT: usize = 10;

pub const TYPING_HISTORY_FILE: &str = "letter_leap_sessions.json";
pub const ARITHMETIC_HISTORY_FILE: &str = "addition_adventure_sessions.json";

/// One finished round, as stored and shown in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Percentage rounded to two decimals.
    pub accuracy_percent: f64,
    /// Words per minute for typing, problems per minute for arithmetic.
    pub rate: f64,
    /// Words completed or problems solved.
    pub items_completed: usize,
    pub longest_streak: usize,
    pub duration_seconds: u64,
    pub score: u64,
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("history io: {0}")]
    Io(#[from] std::io::Error),
    #[error("history format: {0}")]
    Serde(#[from] serde_json::Error),
}

pub trait SessionRecorder {
    /// Prepend `summary` and drop anything past [`HISTORY_LIMIT`].
    fn append(&mut self, summary: SessionSummary) -> Result<(), RecorderError>;
    /// All stored summaries, newest first.
    fn load_all(&self) -> Result<Vec<SessionSummary>, RecorderError>;
}

/// Recorder backed by a JSON file, one file per game.
#[derive(Debug, Clone)]
pub struct JsonFileRecorder {
    path: PathBuf,
}

impl JsonFileRecorder {
    pub fn new(file_name: &str) -> Self {
        Self {
            path: AppDirs::history_path(file_name),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionRecorder for JsonFileRecorder {
    fn append(&mut self, summary: SessionSummary) -> Result<(), RecorderError> {
        // A corrupt file should not block recording; start a fresh history.
        let mut sessions = match self.load_all() {
            Ok(sessions) => sessions,
            Err(err) => {
                tracing::warn!(%err, path = %self.path.display(), "history unreadable, starting fresh");
                Vec::new()
            }
        };
        sessions.insert(0, summary);
        sessions.truncate(HISTORY_LIMIT);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&sessions)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<SessionSummary>, RecorderError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// In-memory recorder for tests; clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    sessions: Rc<RefCell<Vec<SessionSummary>>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRecorder for MemoryRecorder {
    fn append(&mut self, summary: SessionSummary) -> Result<(), RecorderError> {
        let mut sessions = self.sessions.borrow_mut();
        sessions.insert(0, summary);
        sessions.truncate(HISTORY_LIMIT);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<SessionSummary>, RecorderError> {
        Ok(self.sessions.borrow().clone())
    }
}

/// Timestamp plus a short random suffix, unique enough for history rows.
pub fn summary_id(date: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!(
        "{}-{:08x}",
        date.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        suffix
    )
}
