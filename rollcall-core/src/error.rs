//! Common error types for Rollcall

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Rollcall operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types across the Rollcall crates
#[derive(Error, Debug)]
pub enum Error {
    /// Roster source absent at bootstrap (fatal, aborts startup)
    #[error("Roster source not found: {0}")]
    MissingRoster(PathBuf),

    /// Roster source present but not usable as a roster
    #[error("Invalid roster source: {0}")]
    InvalidRoster(String),

    /// Durable record table missing, unreadable, or corrupt at load time
    #[error("Record table unavailable: {0}")]
    StoreUnavailable(String),

    /// Durable rewrite of the record table failed; prior content is intact
    #[error("Failed to persist record table: {0}")]
    Persist(#[source] std::io::Error),

    /// Write lock not acquired within the configured bound
    #[error("Recording engine is busy, try again")]
    Busy,
}
