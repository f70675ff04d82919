//! Recording engine: the sole write path into the record table
//!
//! Every `record` call serializes through one global async lock held across
//! the full load-detect-mutate-persist sequence, so a fingerprint scan never
//! misses an in-flight update and a persist never overwrites another call's
//! result. Lock acquisition is bounded; a submission that cannot acquire the
//! lock in time fails with [`Error::Busy`] instead of waiting forever.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::detect::{self, Verdict};
use crate::error::{Error, Result};
use crate::table::{RecordTable, ATTENDED_MARK};

/// Maximum entries retained in the recent-activity feed
pub const FEED_CAPACITY: usize = 10;

/// Default bound on waiting for the global write lock
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_millis(5000);

/// Ephemeral check-in input; field values are copied into the matched record
#[derive(Debug, Clone)]
pub struct Submission {
    pub identifier: String,
    pub timestamp: String,
    pub origin_address: String,
    pub client_signature: String,
}

/// Externally visible result of a `record` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Fresh check-in accepted and persisted
    Recorded,
    /// Duplicate submission; the stored annotation carries the detail
    Duplicate,
    /// No roster entry with the submitted identifier; nothing was written
    SubjectNotFound,
}

/// One entry of the bounded recent-activity feed
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecentActivity {
    pub identifier: String,
    pub display_name: String,
    pub submit_time: String,
}

/// Serializes all writes to the durable record table.
///
/// The table itself is reloaded from storage on every call so that each
/// submission observes the latest durable state; only the recent-activity
/// feed lives in memory, and it is rebuilt empty on restart.
pub struct RecordingEngine {
    table_path: PathBuf,
    lock_wait: Duration,
    write_lock: Mutex<()>,
    feed: RwLock<VecDeque<RecentActivity>>,
}

impl RecordingEngine {
    pub fn new(table_path: impl Into<PathBuf>) -> Self {
        Self::with_lock_wait(table_path, DEFAULT_LOCK_WAIT)
    }

    pub fn with_lock_wait(table_path: impl Into<PathBuf>, lock_wait: Duration) -> Self {
        Self {
            table_path: table_path.into(),
            lock_wait,
            write_lock: Mutex::new(()),
            feed: RwLock::new(VecDeque::with_capacity(FEED_CAPACITY)),
        }
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    /// Record one attendance submission.
    ///
    /// Loads the table, classifies the submission, writes the submission
    /// fields onto the matched row (even for duplicates, so the stored
    /// fingerprint reflects the most recent attempt), sets the marker, and
    /// persists. A persistence failure is fatal for this submission and is
    /// not retried; the durable table is then unchanged.
    pub async fn record(&self, submission: Submission) -> Result<RecordOutcome> {
        let guard = tokio::time::timeout(self.lock_wait, self.write_lock.lock())
            .await
            .map_err(|_| Error::Busy)?;

        let Submission {
            identifier,
            timestamp,
            origin_address,
            client_signature,
        } = submission;

        // Fresh load per call: every submission sees the latest durable state
        let mut table = RecordTable::load(&self.table_path)?;

        let Some(row) = table.find_by_identifier(&identifier) else {
            info!("Submission for unknown identifier {}", identifier);
            return Ok(RecordOutcome::SubjectNotFound);
        };

        let verdict = detect::classify(&table, row, &origin_address, &client_signature);

        {
            let record = table.record_mut(row);
            record.submit_time = timestamp;
            record.origin_address = origin_address;
            record.client_signature = client_signature;

            record.marker = match &verdict {
                Verdict::Fresh => ATTENDED_MARK.to_string(),
                Verdict::DuplicateByFingerprint { duplicate_with } => {
                    format!("Duplicated with {}", duplicate_with)
                }
                Verdict::DuplicateByMark => "Duplicate submission".to_string(),
            };
        }

        table.persist(&self.table_path)?;

        // Feed mutation stays inside the critical section and happens only
        // after the persist succeeded, so the feed never shows a check-in
        // the durable table does not have.
        let outcome = match verdict {
            Verdict::Fresh => {
                let record = table.record(row);
                let entry = RecentActivity {
                    identifier: record.identifier.clone(),
                    display_name: record.display_name.clone(),
                    submit_time: record.submit_time.clone(),
                };
                let mut feed = self.feed.write().await;
                feed.push_front(entry);
                feed.truncate(FEED_CAPACITY);
                info!("Recorded attendance for {}", identifier);
                RecordOutcome::Recorded
            }
            Verdict::DuplicateByFingerprint { duplicate_with } => {
                warn!(
                    "Duplicate submission for {} (fingerprint collision with {})",
                    identifier, duplicate_with
                );
                RecordOutcome::Duplicate
            }
            Verdict::DuplicateByMark => {
                warn!("Duplicate submission for {} (already marked)", identifier);
                RecordOutcome::Duplicate
            }
        };

        drop(guard);
        Ok(outcome)
    }

    /// Snapshot of the recent-activity feed, newest first, at most
    /// [`FEED_CAPACITY`] entries. Does not take the write lock.
    pub async fn recent_activity(&self) -> Vec<RecentActivity> {
        self.feed.read().await.iter().cloned().collect()
    }
}
