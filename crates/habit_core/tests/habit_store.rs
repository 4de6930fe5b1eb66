use chrono::NaiveTime;
use habit_core::db::open_db_in_memory;
use habit_core::{Habit, HabitStore, HabitValidationError, RepoError, SqliteHabitStore};
use rusqlite::Connection;
use uuid::Uuid;

fn habit(title: &str, days: &[&str]) -> Habit {
    let mut habit = Habit::new(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    habit.title = title.to_string();
    habit.week_days = days.iter().map(|day| day.to_string()).collect();
    habit
}

#[test]
fn staged_write_is_invisible_until_save() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteHabitStore::try_new(&mut conn).unwrap();

    let record = habit("Read", &["Monday"]);
    store.write(&record).unwrap();
    assert!(store.has_pending_changes());
    assert!(store.get_habit(record.uuid).unwrap().is_none());

    store.save().unwrap();
    assert!(!store.has_pending_changes());

    let loaded = store.get_habit(record.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "Read");
    assert_eq!(loaded.color, "Card-1");
    assert_eq!(loaded.week_days, vec!["Monday".to_string()]);
    assert_eq!(loaded.notification_time, record.notification_time);
    assert!(loaded.created_at.is_some());
    assert!(loaded.updated_at.is_some());
}

#[test]
fn write_of_existing_habit_updates_in_place() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteHabitStore::try_new(&mut conn).unwrap();

    let mut record = habit("Read", &["Monday"]);
    store.write(&record).unwrap();
    store.save().unwrap();

    record.title = "Read 20 pages".to_string();
    record.is_reminder_on = true;
    record.reminder_text = "Open the book".to_string();
    record.notification_ids = vec!["a".to_string(), "b".to_string()];
    store.write(&record).unwrap();
    store.save().unwrap();

    let habits = store.list_habits().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].title, "Read 20 pages");
    assert!(habits[0].is_reminder_on);
    assert_eq!(habits[0].notification_ids, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn write_rejects_invalid_habit_without_staging() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteHabitStore::try_new(&mut conn).unwrap();

    let record = habit("", &["Monday"]);
    let err = store.write(&record).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(HabitValidationError::EmptyTitle)
    ));
    assert!(!store.has_pending_changes());
}

#[test]
fn delete_removes_committed_habit() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteHabitStore::try_new(&mut conn).unwrap();

    let keep = habit("Walk", &["Tuesday"]);
    let removed = habit("Run", &["Thursday"]);
    store.write(&keep).unwrap();
    store.write(&removed).unwrap();
    store.save().unwrap();

    store.delete(removed.uuid);
    store.save().unwrap();

    let habits = store.list_habits().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].uuid, keep.uuid);
}

#[test]
fn failed_batch_rolls_back_and_is_discarded() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteHabitStore::try_new(&mut conn).unwrap();

    let record = habit("Meditate", &["Sunday"]);
    let missing = Uuid::new_v4();
    store.write(&record).unwrap();
    store.delete(missing);

    let err = store.save().unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
    assert!(!store.has_pending_changes());
    assert!(store.get_habit(record.uuid).unwrap().is_none());
}

#[test]
fn list_habits_returns_all_committed_records() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteHabitStore::try_new(&mut conn).unwrap();

    for title in ["One", "Two", "Three"] {
        store.write(&habit(title, &["Friday"])).unwrap();
    }
    store.save().unwrap();

    let mut titles: Vec<String> = store
        .list_habits()
        .unwrap()
        .into_iter()
        .map(|habit| habit.title)
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["One", "Three", "Two"]);
}

#[test]
fn week_days_and_ids_are_stored_as_json_arrays() {
    let mut conn = open_db_in_memory().unwrap();
    let mut record = habit("Stretch", &["Monday", "Wednesday"]);
    record.is_reminder_on = true;
    record.reminder_text = "Stretch".to_string();
    record.notification_ids = vec!["id-1".to_string(), "id-2".to_string()];
    {
        let mut store = SqliteHabitStore::try_new(&mut conn).unwrap();
        store.write(&record).unwrap();
        store.save().unwrap();
    }

    let (days, ids, time): (String, String, String) = conn
        .query_row(
            "SELECT week_days, notification_ids, notification_time FROM habits WHERE uuid = ?1;",
            [record.uuid.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    let days: Vec<String> = serde_json::from_str(&days).unwrap();
    let ids: Vec<String> = serde_json::from_str(&ids).unwrap();
    assert_eq!(days, vec!["Monday", "Wednesday"]);
    assert_eq!(ids, vec!["id-1", "id-2"]);
    assert_eq!(time, "09:30");
}

#[test]
fn read_rejects_rows_that_violate_invariants() {
    let mut conn = open_db_in_memory().unwrap();
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO habits (uuid, title, week_days, is_reminder_on, notification_time, notification_ids)
         VALUES (?1, 'Broken', '[\"Monday\"]', 0, '08:00', '[\"orphan\"]');",
        [id.to_string()],
    )
    .unwrap();

    let store = SqliteHabitStore::try_new(&mut conn).unwrap();
    let err = store.get_habit(id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(HabitValidationError::NotificationsWithoutReminder)
    ));
}

#[test]
fn try_new_rejects_foreign_schema() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE habits (uuid TEXT PRIMARY KEY);")
        .unwrap();

    let err = SqliteHabitStore::try_new(&mut conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "habits",
            column: "title"
        }
    ));
}
