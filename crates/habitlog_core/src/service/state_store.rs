//! Habit registry and completion log over an injected persistence adapter.
//!
//! # Responsibility
//! - Own the in-memory `TrackerState` and load it once at construction.
//! - Apply habit/log mutations and persist the whole state after each one.
//! - Expose snapshot import/export, calendar export and derived statistics.
//!
//! # Invariants
//! - Validation and format failures never mutate state or write.
//! - A persistence failure is reported after the in-memory mutation has been
//!   applied; the store stays usable and `flush` retries the write.
//! - Mutations take `&mut self`; multi-threaded hosts wrap the store in a
//!   `Mutex` so read-modify-persist sequences stay serialized.

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, EngineConfig, PersistMode};
use crate::export::calendar::export_calendar_with_prod_id;
use crate::export::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
use crate::model::habit::{
    Category, Difficulty, Habit, HabitId, HabitValidationError, ReminderTime,
};
use crate::model::tracker::{date_key, TrackerState};
use crate::repo::kv_repo::{PersistenceAdapter, RepoError};
use crate::service::progress::{daily_progress, DailyProgress};
use crate::service::streak::{analyze_streaks, StreakStats};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from state store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller input rejected; nothing changed.
    #[error("validation failed: {0}")]
    Validation(#[from] HabitValidationError),
    /// Import payload rejected; prior state kept.
    #[error("import rejected: {0}")]
    Format(#[from] SnapshotError),
    /// In-memory state changed but the durable write failed.
    #[error("state was not persisted: {0}")]
    Persistence(#[from] RepoError),
    /// In-memory state changed but could not be encoded for writing.
    #[error("state could not be encoded for persistence: {0}")]
    Encode(#[source] SnapshotError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StoreError {
    /// Whether memory and durable storage have diverged.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Encode(_))
    }
}

/// Input for `StateStore::add_habit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub category: Category,
    pub difficulty: Difficulty,
    /// `HH:MM`; blank or `None` means no reminder.
    pub reminder: Option<String>,
    pub notes: Option<String>,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, category: Category, difficulty: Difficulty) -> Self {
        Self {
            name: name.into(),
            category,
            difficulty,
            reminder: None,
            notes: None,
        }
    }

    pub fn reminder(mut self, reminder: impl Into<String>) -> Self {
        self.reminder = Some(reminder.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Set while in-memory state is ahead of the adapter.
///
/// Dropping it while set means pending mutations are lost, so it logs.
#[derive(Debug, Default)]
struct PendingWrite(bool);

impl Drop for PendingWrite {
    fn drop(&mut self) {
        if self.0 {
            warn!("event=state_drop module=store status=dirty reason=unflushed_mutations");
        }
    }
}

/// Single-writer owner of the tracker state.
pub struct StateStore<P: PersistenceAdapter, C: Clock = SystemClock> {
    adapter: P,
    clock: C,
    config: EngineConfig,
    state: TrackerState,
    dirty: PendingWrite,
}

impl<P: PersistenceAdapter> StateStore<P, SystemClock> {
    /// Opens a store reading "today" from the system clock.
    pub fn open(adapter: P, config: EngineConfig) -> StoreResult<Self> {
        Self::open_with_clock(adapter, config, SystemClock)
    }
}

impl<P: PersistenceAdapter, C: Clock> StateStore<P, C> {
    /// Opens a store and loads the persisted record.
    ///
    /// An absent or unparseable record starts from the empty state; an
    /// adapter read failure is returned as `Persistence`.
    pub fn open_with_clock(adapter: P, config: EngineConfig, clock: C) -> StoreResult<Self> {
        config.validate()?;

        let state = match adapter.read(&config.storage_key) {
            Ok(Some(text)) => match decode_snapshot(&text) {
                Ok(state) => state,
                Err(err) => {
                    warn!(
                        "event=state_load module=store status=fallback reason=unparseable error={}",
                        err
                    );
                    TrackerState::default()
                }
            },
            Ok(None) => TrackerState::default(),
            Err(err) => {
                error!(
                    "event=state_load module=store status=error error_code=read_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        info!(
            "event=state_load module=store status=ok habits={} days={}",
            state.habits.len(),
            state.logs.len()
        );

        Ok(Self {
            adapter,
            clock,
            config,
            state,
            dirty: PendingWrite::default(),
        })
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn adapter(&self) -> &P {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut P {
        &mut self.adapter
    }

    /// Consumes the store, returning the adapter for reuse.
    ///
    /// Unflushed mutations are discarded; call `flush` first.
    pub fn into_adapter(self) -> P {
        self.adapter
    }

    /// Whether some mutation has not reached the adapter yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty.0
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Validates input and appends a new habit.
    ///
    /// # Errors
    /// - `Validation` when the trimmed name is empty or the reminder is not
    ///   `HH:MM`; no state change and no write.
    /// - `Persistence` when the write fails; the habit is already appended.
    pub fn add_habit(&mut self, request: NewHabit) -> StoreResult<Habit> {
        let reminder = ReminderTime::parse_optional(request.reminder.as_deref())?;
        let mut habit = Habit::with_id(
            self.fresh_id(),
            &request.name,
            request.category,
            request.difficulty,
            self.clock.now(),
        )?;
        habit.reminder = reminder;
        habit.notes = request.notes.unwrap_or_default();

        self.state.habits.push(habit.clone());
        info!(
            "event=habit_add module=store status=ok habit_id={} category={} difficulty={} reminder={} habits={}",
            habit.id,
            habit.category,
            habit.difficulty,
            habit.has_reminder(),
            self.state.habits.len()
        );

        self.commit()?;
        Ok(habit)
    }

    /// Habits in insertion order.
    pub fn list_habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn habit(&self, id: &HabitId) -> Option<&Habit> {
        self.state.habit(id)
    }

    /// Flips the completion mark for `(date, habit_id)`.
    ///
    /// Returns the new mark. Unknown ids are accepted at the log level.
    pub fn toggle(&mut self, habit_id: &HabitId, date: NaiveDate) -> StoreResult<bool> {
        if !self.state.contains_habit(habit_id) {
            warn!(
                "event=log_toggle module=store status=orphan habit_id={} date={}",
                habit_id,
                date_key(date)
            );
        }

        let done = self.state.toggle(habit_id, date);
        debug!(
            "event=log_toggle module=store status=ok habit_id={} date={} done={}",
            habit_id,
            date_key(date),
            done
        );

        self.commit()?;
        Ok(done)
    }

    pub fn toggle_today(&mut self, habit_id: &HabitId) -> StoreResult<bool> {
        let today = self.clock.today();
        self.toggle(habit_id, today)
    }

    pub fn is_done(&self, habit_id: &HabitId, date: NaiveDate) -> bool {
        self.state.is_done(habit_id, date)
    }

    pub fn is_done_today(&self, habit_id: &HabitId) -> bool {
        self.state.is_done(habit_id, self.clock.today())
    }

    /// Streaks ending today over the configured window.
    pub fn streaks(&self) -> StreakStats {
        self.streaks_at(self.clock.today())
    }

    pub fn streaks_at(&self, reference_date: NaiveDate) -> StreakStats {
        analyze_streaks(
            &self.state.habits,
            &self.state.logs,
            reference_date,
            self.config.streak_window_days,
        )
    }

    pub fn progress_today(&self) -> DailyProgress {
        self.progress_on(self.clock.today())
    }

    pub fn progress_on(&self, date: NaiveDate) -> DailyProgress {
        daily_progress(&self.state.habits, &self.state.logs, date)
    }

    /// Pretty-printed JSON backup of the whole state.
    pub fn export_json(&self) -> StoreResult<String> {
        encode_snapshot(&self.state).map_err(StoreError::Encode)
    }

    /// Replaces the whole state with a decoded backup.
    ///
    /// # Errors
    /// - `Format` for malformed or mis-shaped text; prior state untouched.
    /// - `Persistence` when the write fails after replacement.
    pub fn import_json(&mut self, text: &str) -> StoreResult<()> {
        let imported = match decode_snapshot(text) {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    "event=state_import module=store status=rejected input_bytes={} error={}",
                    text.len(),
                    err
                );
                return Err(err.into());
            }
        };

        self.state = imported;
        info!(
            "event=state_import module=store status=ok habits={} days={}",
            self.state.habits.len(),
            self.state.logs.len()
        );
        self.commit()
    }

    /// Calendar feed of reminders stamped with today's date.
    pub fn export_calendar(&self) -> String {
        self.export_calendar_at(self.clock.today())
    }

    pub fn export_calendar_at(&self, reference_date: NaiveDate) -> String {
        export_calendar_with_prod_id(
            &self.state.habits,
            reference_date,
            &self.config.calendar_prod_id,
        )
    }

    /// Writes pending state; no-op when nothing is pending.
    pub fn flush(&mut self) -> StoreResult<()> {
        if !self.dirty.0 {
            return Ok(());
        }
        self.write_state()
    }

    fn commit(&mut self) -> StoreResult<()> {
        match self.config.persist_mode {
            PersistMode::WriteThrough => self.write_state(),
            PersistMode::Deferred => {
                self.dirty.0 = true;
                Ok(())
            }
        }
    }

    fn write_state(&mut self) -> StoreResult<()> {
        self.dirty.0 = true;
        let text = encode_snapshot(&self.state).map_err(StoreError::Encode)?;

        if let Err(err) = self.adapter.write(&self.config.storage_key, &text) {
            error!(
                "event=state_persist module=store status=error error_code=write_failed bytes={} error={}",
                text.len(),
                err
            );
            return Err(err.into());
        }

        self.dirty.0 = false;
        debug!(
            "event=state_persist module=store status=ok bytes={}",
            text.len()
        );
        Ok(())
    }

    fn fresh_id(&self) -> HabitId {
        loop {
            let id = HabitId::generate();
            let in_log = self.state.logs.values().any(|log| log.contains_key(&id));
            if !self.state.contains_habit(&id) && !in_log {
                return id;
            }
        }
    }
}
