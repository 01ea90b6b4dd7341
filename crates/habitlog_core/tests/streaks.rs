use chrono::{Days, NaiveDate, TimeZone, Utc};
use habitlog_core::{
    analyze_streaks, Category, Difficulty, EngineConfig, FixedClock, Habit, HabitId,
    MemoryKvStore, NewHabit, StateStore, StreakStats, TrackerState,
};
use proptest::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()
}

fn days_ago(n: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(n)).unwrap()
}

fn habit(name: &str) -> Habit {
    let created = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
    Habit::new(name, Category::Health, Difficulty::Easy, created).unwrap()
}

#[test]
fn two_habits_done_two_days_gives_streak_of_two() {
    let mut store = StateStore::open_with_clock(
        MemoryKvStore::new(),
        EngineConfig::default(),
        FixedClock::on(today()),
    )
    .unwrap();
    let h1 = store
        .add_habit(NewHabit::new("H1", Category::Health, Difficulty::Easy))
        .unwrap();
    let h2 = store
        .add_habit(NewHabit::new("H2", Category::Productivity, Difficulty::Hard))
        .unwrap();

    for day in [days_ago(0), days_ago(1)] {
        store.toggle(&h1.id, day).unwrap();
        store.toggle(&h2.id, day).unwrap();
    }
    store.toggle(&h1.id, days_ago(2)).unwrap();

    assert_eq!(
        store.streaks(),
        StreakStats {
            current_streak: 2,
            longest_streak: 2,
        }
    );
}

#[test]
fn zero_habits_never_form_a_streak() {
    let mut state = TrackerState::new();
    for n in 0..30 {
        state.toggle(&HabitId::generate(), days_ago(n));
    }

    let stats = analyze_streaks(&state.habits, &state.logs, today(), 60);
    assert_eq!(stats, StreakStats::default());
}

#[test]
fn adding_a_habit_breaks_past_streaks_retroactively() {
    let first = habit("first");
    let mut state = TrackerState::new();
    state.habits.push(first.clone());
    for n in 0..5 {
        state.toggle(&first.id, days_ago(n));
    }
    assert_eq!(analyze_streaks(&state.habits, &state.logs, today(), 60).current_streak, 5);

    state.habits.push(habit("second"));
    assert_eq!(
        analyze_streaks(&state.habits, &state.logs, today(), 60),
        StreakStats::default()
    );
}

#[test]
fn explicit_false_mark_counts_as_not_done() {
    let only = habit("only");
    let mut state = TrackerState::new();
    state.habits.push(only.clone());
    state.toggle(&only.id, today());
    state.toggle(&only.id, today());
    state.toggle(&only.id, days_ago(1));

    let stats = analyze_streaks(&state.habits, &state.logs, today(), 60);
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 1);
}

#[test]
fn older_run_can_be_longest() {
    let only = habit("only");
    let mut state = TrackerState::new();
    state.habits.push(only.clone());
    state.toggle(&only.id, today());
    for n in 3..10 {
        state.toggle(&only.id, days_ago(n));
    }

    let stats = analyze_streaks(&state.habits, &state.logs, today(), 60);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.longest_streak, 7);
}

proptest! {
    #[test]
    fn current_streak_is_bounded(
        done_days in proptest::collection::vec(proptest::collection::vec(any::<bool>(), 2), 0..90),
        window in 1u32..90,
    ) {
        let habits = vec![habit("a"), habit("b")];
        let mut state = TrackerState::new();
        state.habits = habits.clone();
        for (offset, marks) in done_days.iter().enumerate() {
            for (habit, done) in habits.iter().zip(marks) {
                if *done {
                    state.toggle(&habit.id, days_ago(offset as u64));
                }
            }
        }

        let stats = analyze_streaks(&state.habits, &state.logs, today(), window);
        prop_assert!(stats.current_streak <= window);
        prop_assert!(stats.longest_streak <= window);
        prop_assert!(stats.current_streak <= stats.longest_streak);
    }

    #[test]
    fn no_habits_means_zero_streaks(offsets in proptest::collection::vec(0u64..120, 0..40)) {
        let mut state = TrackerState::new();
        for offset in offsets {
            state.toggle(&HabitId::generate(), days_ago(offset));
        }
        prop_assert_eq!(
            analyze_streaks(&state.habits, &state.logs, today(), 60),
            StreakStats::default()
        );
    }
}
