//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record and its closed enumerations.
//! - Normalize optional reminder input into one explicit optional type.
//!
//! # Invariants
//! - `id` is generated once and never reused for another habit.
//! - `name` is non-empty after trimming.
//! - `reminder` is either absent or a strict `HH:MM` time of day.

use chrono::{DateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

static REMINDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid reminder regex"));

/// Stable, opaque identifier for every habit.
///
/// New habits get a UUID v4; ids read from backups are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for HabitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Validation failures for habit input and persisted habit data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HabitValidationError {
    /// Habit name is blank after trimming.
    #[error("habit name must not be blank")]
    EmptyName,
    /// Reminder text is not a `HH:MM` time of day.
    #[error("invalid reminder time `{0}`; expected HH:MM")]
    InvalidReminder(String),
    /// Category text is not one of the known categories.
    #[error("unknown habit category `{0}`")]
    UnknownCategory(String),
    /// Difficulty text is not one of the known levels.
    #[error("unknown habit difficulty `{0}`")]
    UnknownDifficulty(String),
    /// Two habits share the same id.
    #[error("duplicate habit id: {0}")]
    DuplicateId(HabitId),
}

/// Closed set of habit categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Productivity,
    Learning,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Productivity => "productivity",
            Self::Learning => "learning",
            Self::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = HabitValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "health" => Ok(Self::Health),
            "productivity" => Ok(Self::Productivity),
            "learning" => Ok(Self::Learning),
            "other" => Ok(Self::Other),
            _ => Err(HabitValidationError::UnknownCategory(value.to_string())),
        }
    }
}

/// Ordinal effort level of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = HabitValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(HabitValidationError::UnknownDifficulty(value.to_string())),
        }
    }
}

/// Daily reminder time of day, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderTime(NaiveTime);

impl ReminderTime {
    /// Parses strict `HH:MM` text.
    pub fn parse(value: &str) -> Result<Self, HabitValidationError> {
        let trimmed = value.trim();
        if !REMINDER_RE.is_match(trimmed) {
            return Err(HabitValidationError::InvalidReminder(value.to_string()));
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Self)
            .map_err(|_| HabitValidationError::InvalidReminder(value.to_string()))
    }

    /// Parses optional reminder input where blank text means "no reminder".
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, HabitValidationError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => Self::parse(text).map(Some),
        }
    }
}

impl Display for ReminderTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ReminderTime {
    type Err = HabitValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for ReminderTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReminderTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Canonical habit record.
///
/// Field names on the wire match the backup format (`createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub category: Category,
    pub difficulty: Difficulty,
    /// Older backups store "no reminder" as `""`; both decode to `None`.
    #[serde(default, deserialize_with = "deserialize_reminder")]
    pub reminder: Option<ReminderTime>,
    #[serde(default, deserialize_with = "deserialize_notes")]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Creates a habit with a freshly generated id.
    ///
    /// # Errors
    /// - Returns `EmptyName` when `name` is blank after trimming.
    pub fn new(
        name: &str,
        category: Category,
        difficulty: Difficulty,
        created_at: DateTime<Utc>,
    ) -> Result<Self, HabitValidationError> {
        Self::with_id(HabitId::generate(), name, category, difficulty, created_at)
    }

    /// Creates a habit with a caller-provided id.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: HabitId,
        name: &str,
        category: Category,
        difficulty: Difficulty,
        created_at: DateTime<Utc>,
    ) -> Result<Self, HabitValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_string(),
            category,
            difficulty,
            reminder: None,
            notes: String::new(),
            created_at,
        })
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        Ok(())
    }

    pub fn has_reminder(&self) -> bool {
        self.reminder.is_some()
    }
}

fn deserialize_reminder<'de, D>(deserializer: D) -> Result<Option<ReminderTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    ReminderTime::parse_optional(raw.as_deref()).map_err(serde::de::Error::custom)
}

fn deserialize_notes<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{Category, Difficulty, HabitId, HabitValidationError, ReminderTime};

    #[test]
    fn reminder_requires_two_digit_fields() {
        assert!(ReminderTime::parse("08:00").is_ok());
        assert!(ReminderTime::parse("23:59").is_ok());
        for bad in ["8:00", "24:00", "12:60", "noon", "08:00:00"] {
            assert_eq!(
                ReminderTime::parse(bad).unwrap_err(),
                HabitValidationError::InvalidReminder(bad.to_string())
            );
        }
    }

    #[test]
    fn blank_reminder_means_absent() {
        assert_eq!(ReminderTime::parse_optional(None).unwrap(), None);
        assert_eq!(ReminderTime::parse_optional(Some("  ")).unwrap(), None);
        let parsed = ReminderTime::parse_optional(Some("07:30")).unwrap();
        assert_eq!(parsed.map(|time| time.to_string()).as_deref(), Some("07:30"));
    }

    #[test]
    fn generated_ids_are_distinct_uuids() {
        let first = HabitId::generate();
        let second = HabitId::generate();
        assert_ne!(first, second);
        assert!(uuid::Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn ids_keep_their_text() {
        let id = HabitId::from("H1-Legacy");
        assert_eq!(id.to_string(), "H1-Legacy");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""H1-Legacy""#);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("Health".parse::<Category>().unwrap(), Category::Health);
        assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("fitness".parse::<Category>().is_err());
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
    }
}
