//! Sync configuration.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default quiet period before a burst of edits is written out.
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 1000;

/// Configuration for the sync queue and local document storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory holding the markdown documents.
    pub documents_dir: PathBuf,
    /// Milliseconds without a new enqueue before the queue drains.
    pub quiet_period_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("questions"),
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
        }
    }
}

impl SyncConfig {
    /// Load configuration from the environment.
    ///
    /// Reads a `.env` file if present, then:
    /// - QUIZ_DOCUMENTS_DIR: document directory (default `questions`)
    /// - QUIZ_SYNC_QUIET_MS: quiet period in milliseconds (default 1000)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let documents_dir = std::env::var("QUIZ_DOCUMENTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.documents_dir);

        let quiet_period_ms = match std::env::var("QUIZ_SYNC_QUIET_MS") {
            Ok(value) => value.trim().parse::<u64>().map_err(|_| {
                SyncError::Config(format!("QUIZ_SYNC_QUIET_MS is not a number: {}", value))
            })?,
            Err(_) => defaults.quiet_period_ms,
        };

        Ok(Self {
            documents_dir,
            quiet_period_ms,
        })
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period_ms = quiet_period.as_millis() as u64;
        self
    }
}
