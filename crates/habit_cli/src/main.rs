//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `habit_core` linkage without a mobile host.
//! - Start file logging under the system temp directory.
//! - Run one create/edit/delete cycle against in-memory collaborators and
//!   print deterministic, id-free output.

use chrono::{NaiveDate, NaiveTime};
use habit_core::db::open_db_in_memory;
use habit_core::{
    default_log_level, init_logging, EditorConfig, HabitEditor, HabitStore,
    InMemoryNotificationCenter, SqliteHabitStore,
};
use std::error::Error;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("habit_core ping={}", habit_core::ping());
    println!("habit_core version={}", habit_core::core_version());

    let log_dir = std::env::temp_dir().join("habit_cli_logs");
    match init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        Ok(()) => println!("logging level={} ok", default_log_level()),
        Err(err) => println!("logging disabled: {err}"),
    }

    let center = Arc::new(InMemoryNotificationCenter::new());
    let mut conn = open_db_in_memory()?;
    let mut store = SqliteHabitStore::try_new(&mut conn)?;
    let mut editor = HabitEditor::new(Arc::clone(&center), EditorConfig::default());

    let granted = editor.request_notification_access().await;
    println!("notification access granted={granted}");

    let form = editor.state_mut();
    form.title = "Stretch".to_string();
    form.set_week_days(["Monday", "Wednesday"]);
    form.is_reminder_on = true;
    form.reminder_text = "Five minutes of stretching".to_string();
    form.reminder_time = NaiveTime::from_hms_opt(9, 30, 0).ok_or("invalid time")?;

    let report = editor.save(&mut store).await?;
    println!(
        "saved created={} reminders={} pending={}",
        report.created,
        report.notification_ids.len(),
        center.pending_ids().len()
    );

    let monday = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|day| day.and_hms_opt(9, 30, 0))
        .ok_or("invalid date")?;
    for delivery in center.deliveries_at(monday, true) {
        println!(
            "fires weekday={} at {:02}:{:02} banner={} sound={}",
            delivery.request.trigger.weekday,
            delivery.request.trigger.hour,
            delivery.request.trigger.minute,
            delivery.presentation.banner,
            delivery.presentation.sound
        );
    }

    let habit = store
        .get_habit(report.habit_id)?
        .ok_or("saved habit missing on read-back")?;
    editor.load_for_edit(&habit);
    editor.state_mut().is_reminder_on = false;
    editor.save(&mut store).await?;
    println!(
        "reminders off pending={} habits={}",
        center.pending_ids().len(),
        store.list_habits()?.len()
    );

    let habit = store
        .get_habit(report.habit_id)?
        .ok_or("edited habit missing on read-back")?;
    editor.load_for_edit(&habit);
    editor.delete(&mut store).await?;
    println!("deleted habits={}", store.list_habits()?.len());

    Ok(())
}
