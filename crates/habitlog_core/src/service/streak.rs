//! Streak statistics derived from the completion log.
//!
//! # Invariants
//! - Pure: output depends only on the arguments, nothing is cached.
//! - A day is complete only when every current habit is done; with zero
//!   habits no day is complete.
//! - Only `window_size` days ending at the reference date are examined, so
//!   longer streaks are reported truncated to the window.

use crate::model::habit::{Habit, HabitId};
use crate::model::tracker::DayLog;
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Default number of days examined, today included.
pub const DEFAULT_STREAK_WINDOW_DAYS: u32 = 60;

/// Current and longest all-habits-done runs within the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakStats {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Computes streaks over `window_size` days ending at `reference_date`.
///
/// Log entries for ids that are not in `habits` are ignored.
pub fn analyze_streaks(
    habits: &[Habit],
    logs: &BTreeMap<NaiveDate, DayLog>,
    reference_date: NaiveDate,
    window_size: u32,
) -> StreakStats {
    let ids: Vec<&HabitId> = habits.iter().map(|habit| &habit.id).collect();
    if ids.is_empty() {
        return StreakStats::default();
    }

    let is_complete = |day: NaiveDate| {
        logs.get(&day).is_some_and(|log| {
            ids.iter()
                .all(|id| log.get(*id).copied().unwrap_or(false))
        })
    };

    let mut stats = StreakStats::default();
    let mut run = 0;
    let mut in_current = true;
    for offset in 0..window_size {
        let Some(day) = reference_date.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };

        if is_complete(day) {
            run += 1;
            stats.longest_streak = stats.longest_streak.max(run);
        } else {
            run = 0;
            in_current = false;
        }

        if in_current {
            stats.current_streak = run;
        }
    }

    stats
}
