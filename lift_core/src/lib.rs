#![forbid(unsafe_code)]

//! Workout analytics and personal-record engine.
//!
//! This crate provides:
//! - Domain types (sessions, typed sets, metrics, statistics, records)
//! - Exercise classification against a reference catalogue
//! - Per-session scanning and cross-session statistics
//! - Per-exercise progress history with personal-record flags
//! - Epley 1RM estimation and the personal-record store
//! - Persistence (session log, record store, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod logging;
pub mod units;
pub mod scan;
pub mod stats;
pub mod progress;
pub mod cache;
pub mod records;
pub mod session_log;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use classify::classify;
pub use config::Config;
pub use units::UnitSystem;
pub use scan::scan_session;
pub use stats::{compute_exercise_statistics, exercise_statistics, group_by_muscle};
pub use progress::{compute_exercise_history, ExerciseHistory};
pub use cache::StatsCache;
pub use records::{
    estimate_one_rep_max, JsonRecordStore, LiftInput, PersonalRecordTracker, RecordOutcome,
    RecordStore,
};
pub use session_log::{import_sessions, read_sessions, JsonlSink, SessionSink};
pub use export::export_statistics_csv;
