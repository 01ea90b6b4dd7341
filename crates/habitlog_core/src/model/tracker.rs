//! Tracker state: habit list plus per-day completion log.
//!
//! # Responsibility
//! - Hold the single unit of persistence (`habits` + `logs`).
//! - Provide in-memory completion-log primitives (toggle, lookup).
//!
//! # Invariants
//! - `habits` keeps insertion order, which is also display order.
//! - A `DayLog` is only materialized on the first toggle for that day.
//! - Log entries may reference habit ids that no longer exist.
//! - Day keys on the wire are exactly `YYYY-MM-DD`; any other spelling of a
//!   date is rejected rather than normalized.

use crate::model::habit::{Habit, HabitId, HabitValidationError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};

static DAY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid day key regex"));

/// Completion marks for one calendar day, keyed by habit id.
///
/// An absent entry means "not completed".
pub type DayLog = BTreeMap<HabitId, bool>;

/// Formats a calendar day as its `YYYY-MM-DD` log key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Full persisted tracker state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerState {
    pub habits: Vec<Habit>,
    #[serde(deserialize_with = "deserialize_logs")]
    pub logs: BTreeMap<NaiveDate, DayLog>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns one habit by id.
    pub fn habit(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| &habit.id == id)
    }

    pub fn contains_habit(&self, id: &HabitId) -> bool {
        self.habit(id).is_some()
    }

    /// Returns whether `habit_id` is marked done on `date`.
    pub fn is_done(&self, habit_id: &HabitId, date: NaiveDate) -> bool {
        self.logs
            .get(&date)
            .and_then(|day| day.get(habit_id))
            .copied()
            .unwrap_or(false)
    }

    /// Flips the mark for `(date, habit_id)` and returns the new value.
    pub fn toggle(&mut self, habit_id: &HabitId, date: NaiveDate) -> bool {
        let day = self.logs.entry(date).or_default();
        let mark = day.entry(habit_id.clone()).or_insert(false);
        *mark = !*mark;
        *mark
    }

    /// Checks state-level invariants for data coming from outside the engine.
    ///
    /// # Errors
    /// - Any habit fails `Habit::validate()`.
    /// - Two habits share one id.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        let mut seen = HashSet::with_capacity(self.habits.len());
        for habit in &self.habits {
            habit.validate()?;
            if !seen.insert(&habit.id) {
                return Err(HabitValidationError::DuplicateId(habit.id.clone()));
            }
        }
        Ok(())
    }
}

/// Parses one wire day key, accepting only the zero-padded form.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    if !DAY_KEY_RE.is_match(key) {
        return None;
    }
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .ok()
        .filter(|date| date_key(*date) == key)
}

fn deserialize_logs<'de, D>(deserializer: D) -> Result<BTreeMap<NaiveDate, DayLog>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, DayLog>::deserialize(deserializer)?;
    let mut logs = BTreeMap::new();
    for (key, day) in raw {
        let date = parse_date_key(&key).ok_or_else(|| {
            <D::Error as serde::de::Error>::custom(format!(
                "invalid day key `{key}`; expected YYYY-MM-DD"
            ))
        })?;
        if logs.insert(date, day).is_some() {
            return Err(serde::de::Error::custom(format!("duplicate day key `{key}`")));
        }
    }
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::{date_key, parse_date_key, TrackerState};
    use crate::model::habit::HabitId;
    use chrono::NaiveDate;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn toggle_materializes_day_log_lazily() {
        let mut state = TrackerState::new();
        let habit_id = HabitId::generate();
        let date = day("2026-03-01");

        assert!(!state.is_done(&habit_id, date));
        assert!(state.logs.is_empty());

        assert!(state.toggle(&habit_id, date));
        assert!(state.is_done(&habit_id, date));
        assert!(!state.toggle(&habit_id, date));
        assert_eq!(state.logs.get(&date).map(|log| log.len()), Some(1));
    }

    #[test]
    fn date_key_is_zero_padded() {
        assert_eq!(date_key(day("2026-03-01")), "2026-03-01");
    }

    #[test]
    fn parse_date_key_accepts_only_padded_dates() {
        assert_eq!(parse_date_key("2026-01-05"), Some(day("2026-01-05")));
        for bad in ["2026-1-5", "2026-01-5", "26-01-05", "2026-02-30", " 2026-01-05"] {
            assert_eq!(parse_date_key(bad), None, "accepted {bad}");
        }
    }
}
