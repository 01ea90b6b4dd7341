//! Core domain logic for the habit tracker.
//! This crate is the single source of truth for habit, log and streak rules.

pub mod clock;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig, PersistMode, DEFAULT_STORAGE_KEY};
pub use export::calendar::{
    export_calendar, export_calendar_with_prod_id, CALENDAR_FILE_NAME, CALENDAR_MIME_TYPE,
};
pub use export::snapshot::{
    backup_file_name, decode_snapshot, encode_snapshot, SnapshotError, JSON_MIME_TYPE,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::habit::{
    Category, Difficulty, Habit, HabitId, HabitValidationError, ReminderTime,
};
pub use model::tracker::{date_key, parse_date_key, DayLog, TrackerState};
pub use repo::kv_repo::{MemoryKvStore, PersistenceAdapter, RepoError, RepoResult, SqliteKvStore};
pub use service::progress::{daily_progress, DailyProgress};
pub use service::state_store::{NewHabit, StateStore, StoreError, StoreResult};
pub use service::streak::{analyze_streaks, StreakStats, DEFAULT_STREAK_WINDOW_DAYS};

/// Minimal health-check API for embedding hosts.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
