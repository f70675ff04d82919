//! # Rollcall Core Library
//!
//! Attendance recording and duplicate detection shared by the Rollcall
//! services:
//! - Roster loading and record table bootstrap
//! - Durable record table with atomic full-file rewrite
//! - Duplicate detection (fingerprint collision and prior mark)
//! - Recording engine with a bounded recent-activity feed

pub mod detect;
pub mod engine;
pub mod error;
pub mod roster;
pub mod table;

pub use engine::{RecentActivity, RecordOutcome, RecordingEngine, Submission};
pub use error::{Error, Result};
