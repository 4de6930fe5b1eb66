//! Core domain logic for the habit tracker.
//! This crate is the single source of truth for habit and reminder invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use config::{AuthorizationOptions, EditorConfig, PresentationOptions, ReminderConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::habit::{Habit, HabitId, HabitValidationError, DEFAULT_HABIT_COLOR};
pub use model::weekday::{parse_weekday_name, trigger_index, WEEKDAY_NAMES};
pub use notify::{
    CalendarTrigger, InMemoryNotificationCenter, NotificationCenter, NotificationContent,
    NotificationError, NotificationRequest,
};
pub use repo::habit_store::{HabitStore, RepoError, RepoResult, SqliteHabitStore};
pub use service::habit_editor::{
    EditorError, EditorResult, EditorState, HabitEditor, SaveReport,
};
pub use service::reminder_scheduler::{
    plan_triggers, ReminderScheduler, ScheduleOutcome, SchedulingError, TriggerPlan,
};
pub use service::shared_editor::SharedHabitEditor;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
