//! Habit domain model.
//!
//! # Responsibility
//! - Define the persisted habit record.
//! - Validate record invariants before writes and after reads.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another habit.
//! - `is_reminder_on` requires non-empty `reminder_text` and `week_days`.
//! - A habit with reminders off has no outstanding `notification_ids`.

use crate::model::weekday::{parse_weekday_name, weekday_name};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a habit record.
pub type HabitId = Uuid;

/// Theme identifier assigned when the user picks nothing.
pub const DEFAULT_HABIT_COLOR: &str = "Card-1";

/// Persisted habit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub uuid: HabitId,
    /// Display title. Empty string means "unset".
    pub title: String,
    /// Visual theme identifier.
    pub color: String,
    /// Canonical weekday names; order is not significant.
    pub week_days: Vec<String>,
    pub is_reminder_on: bool,
    /// Reminder body shown as notification subtitle.
    pub reminder_text: String,
    /// Only hour and minute are meaningful.
    pub notification_time: NaiveTime,
    /// Ids of the triggers registered at the last successful schedule.
    pub notification_ids: Vec<String>,
    /// Unix epoch milliseconds, assigned by storage.
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds, assigned by storage.
    pub updated_at: Option<i64>,
}

impl Habit {
    /// Allocates a blank habit with a generated stable ID.
    ///
    /// The blank record does not pass `validate()` until a title and
    /// weekdays are filled in.
    pub fn new(notification_time: NaiveTime) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: String::new(),
            color: DEFAULT_HABIT_COLOR.to_string(),
            week_days: Vec::new(),
            is_reminder_on: false,
            reminder_text: String::new(),
            notification_time,
            notification_ids: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns whether notifications may currently be outstanding for this habit.
    pub fn has_outstanding_notifications(&self) -> bool {
        !self.notification_ids.is_empty()
    }

    /// Checks record invariants.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.title.is_empty() {
            return Err(HabitValidationError::EmptyTitle);
        }
        if self.week_days.is_empty() {
            return Err(HabitValidationError::NoWeekDays);
        }

        let mut seen = HashSet::new();
        for name in &self.week_days {
            let key = parse_weekday_name(name)
                .map(|day| weekday_name(day).to_string())
                .unwrap_or_else(|| name.clone());
            if !seen.insert(key) {
                return Err(HabitValidationError::DuplicateWeekDay(name.clone()));
            }
        }

        if self.is_reminder_on && self.reminder_text.is_empty() {
            return Err(HabitValidationError::EmptyReminderText);
        }
        if !self.is_reminder_on && !self.notification_ids.is_empty() {
            return Err(HabitValidationError::NotificationsWithoutReminder);
        }

        Ok(())
    }
}

/// Invariant violations of a `Habit` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    EmptyTitle,
    NoWeekDays,
    DuplicateWeekDay(String),
    EmptyReminderText,
    NotificationsWithoutReminder,
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "habit title must not be empty"),
            Self::NoWeekDays => write!(f, "habit must be active on at least one weekday"),
            Self::DuplicateWeekDay(name) => write!(f, "weekday `{name}` is listed twice"),
            Self::EmptyReminderText => {
                write!(f, "reminder text must not be empty when reminders are on")
            }
            Self::NotificationsWithoutReminder => {
                write!(f, "habit with reminders off must not keep notification ids")
            }
        }
    }
}

impl Error for HabitValidationError {}
