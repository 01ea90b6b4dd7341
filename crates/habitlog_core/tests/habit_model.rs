use chrono::{TimeZone, Utc};
use habitlog_core::{Category, Difficulty, Habit, HabitId, HabitValidationError, ReminderTime};

fn created_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap()
}

#[test]
fn habit_new_trims_name_and_sets_defaults() {
    let habit = Habit::new("  Meditate ", Category::Health, Difficulty::Easy, created_at()).unwrap();

    assert!(!habit.id.as_str().is_empty());
    assert_eq!(habit.name, "Meditate");
    assert_eq!(habit.reminder, None);
    assert_eq!(habit.notes, "");
    assert_eq!(habit.created_at, created_at());
}

#[test]
fn habit_new_rejects_blank_name() {
    let err = Habit::new(" \t ", Category::Other, Difficulty::Hard, created_at()).unwrap_err();
    assert_eq!(err, HabitValidationError::EmptyName);
}

#[test]
fn habit_serialization_uses_backup_wire_fields() {
    let id = HabitId::new("11111111-2222-4333-8444-555555555555");
    let mut habit = Habit::with_id(
        id.clone(),
        "Read 20 pages",
        Category::Learning,
        Difficulty::Medium,
        created_at(),
    )
    .unwrap();
    habit.reminder = Some(ReminderTime::parse("21:15").unwrap());
    habit.notes = "before bed".to_string();

    let json = serde_json::to_value(&habit).unwrap();
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["name"], "Read 20 pages");
    assert_eq!(json["category"], "learning");
    assert_eq!(json["difficulty"], "medium");
    assert_eq!(json["reminder"], "21:15");
    assert_eq!(json["notes"], "before bed");
    assert_eq!(json["createdAt"], "2026-02-13T10:00:00Z");

    let decoded: Habit = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, habit);
}

#[test]
fn absent_reminder_serializes_as_null() {
    let habit = Habit::new("Walk", Category::Health, Difficulty::Easy, created_at()).unwrap();
    let json = serde_json::to_value(&habit).unwrap();
    assert!(json["reminder"].is_null());
}

#[test]
fn deserialize_normalizes_empty_reminder_and_null_notes() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Stretch",
        "category": "health",
        "difficulty": "easy",
        "reminder": "",
        "notes": null,
        "createdAt": "2026-02-13T10:00:00.000Z"
    });

    let habit: Habit = serde_json::from_value(value).unwrap();
    assert_eq!(habit.reminder, None);
    assert_eq!(habit.notes, "");
}

#[test]
fn deserialize_rejects_malformed_reminder_and_unknown_category() {
    let bad_reminder = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Stretch",
        "category": "health",
        "difficulty": "easy",
        "reminder": "7am",
        "notes": "",
        "createdAt": "2026-02-13T10:00:00Z"
    });
    let err = serde_json::from_value::<Habit>(bad_reminder).unwrap_err();
    assert!(err.to_string().contains("invalid reminder time"), "unexpected error: {err}");

    let bad_category = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Stretch",
        "category": "fitness",
        "difficulty": "easy",
        "reminder": null,
        "notes": "",
        "createdAt": "2026-02-13T10:00:00Z"
    });
    assert!(serde_json::from_value::<Habit>(bad_category).is_err());
}
