//! JSON snapshot codec for backup/restore and the persisted record.
//!
//! # Invariants
//! - Encoding is deterministic: the same state always yields the same bytes.
//! - Decoding never returns a state that violates `TrackerState::validate()`.

use crate::model::habit::HabitValidationError;
use crate::model::tracker::{date_key, TrackerState};
use chrono::NaiveDate;
use thiserror::Error;

/// MIME type of the backup file.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Snapshot text cannot be encoded, parsed, or is not tracker-shaped.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Syntax error or a value of the wrong shape (e.g. `habits` not a list).
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// Well-formed JSON whose contents break a model invariant.
    #[error("invalid snapshot contents: {0}")]
    Invalid(#[from] HabitValidationError),
}

/// Serializes the whole state as pretty-printed JSON.
pub fn encode_snapshot(state: &TrackerState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parses and validates snapshot text.
///
/// Both `habits` and `logs` must be present; log keys must be `YYYY-MM-DD`
/// dates and log values booleans.
pub fn decode_snapshot(text: &str) -> Result<TrackerState, SnapshotError> {
    let state: TrackerState = serde_json::from_str(text)?;
    state.validate()?;
    Ok(state)
}

/// Download name for a backup taken on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("habit-tracker-backup-{}.json", date_key(date))
}
