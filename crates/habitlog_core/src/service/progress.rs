//! Per-day done/remaining counts over current habits.

use crate::model::habit::Habit;
use crate::model::tracker::DayLog;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyProgress {
    pub done: usize,
    pub remaining: usize,
    pub total: usize,
}

/// Counts current habits done on `date`.
///
/// Marks for ids outside `habits` do not count toward `done`.
pub fn daily_progress(
    habits: &[Habit],
    logs: &BTreeMap<NaiveDate, DayLog>,
    date: NaiveDate,
) -> DailyProgress {
    let total = habits.len();
    let done = logs.get(&date).map_or(0, |log| {
        habits
            .iter()
            .filter(|habit| log.get(&habit.id).copied().unwrap_or(false))
            .count()
    });

    DailyProgress {
        done,
        remaining: total.saturating_sub(done),
        total,
    }
}
