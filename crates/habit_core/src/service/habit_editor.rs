//! Habit editing use-case.
//!
//! # Responsibility
//! - Own the transient create/edit form.
//! - Orchestrate reminder scheduling and store commits for save and delete.
//!
//! # Invariants
//! - Validation failures never reach the store or the notification center.
//! - Ids stored on a habit are cancelled before replacements are issued.
//! - The form resets only after a successful save.
//!
//! # See also
//! - `service::reminder_scheduler` for trigger derivation.

use crate::config::{EditorConfig, PresentationOptions};
use crate::model::habit::{Habit, HabitId, HabitValidationError};
use crate::model::weekday::{parse_weekday_name, weekday_name};
use crate::notify::NotificationCenter;
use crate::repo::habit_store::{HabitStore, RepoError};
use crate::service::reminder_scheduler::{ReminderScheduler, SchedulingError};
use chrono::NaiveTime;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EditorResult<T> = Result<T, EditorError>;

/// Failure of an editor action. Callers usually only need `is_ok()`.
#[derive(Debug)]
pub enum EditorError {
    /// Form is incomplete; nothing was touched.
    Validation(HabitValidationError),
    /// Store commit failed. Reminders registered by the attempt stay registered.
    Persistence(RepoError),
    /// A reminder registration failed; the attempt's registrations were cancelled.
    Scheduling(SchedulingError),
    /// Delete was requested without an edit target.
    NotEditing,
    /// Another save or delete is in flight on the same editor.
    Busy,
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "habit form is incomplete: {err}"),
            Self::Persistence(err) => write!(f, "failed to persist habit: {err}"),
            Self::Scheduling(err) => write!(f, "{err}"),
            Self::NotEditing => write!(f, "no habit is being edited"),
            Self::Busy => write!(f, "another habit save or delete is in progress"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::Scheduling(err) => Some(err),
            Self::NotEditing | Self::Busy => None,
        }
    }
}

/// Transient form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub title: String,
    pub color: String,
    pub week_days: Vec<String>,
    pub is_reminder_on: bool,
    pub reminder_text: String,
    pub reminder_time: NaiveTime,
    /// Habit being edited; `None` while creating.
    pub editing: Option<Habit>,
}

impl EditorState {
    pub fn with_defaults(config: &EditorConfig) -> Self {
        Self {
            title: String::new(),
            color: config.default_color.clone(),
            week_days: Vec::new(),
            is_reminder_on: false,
            reminder_text: String::new(),
            reminder_time: config.default_reminder_time,
            editing: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Flips one weekday in the selection and returns whether it is now selected.
    ///
    /// Unknown names are left untouched and report `false`.
    pub fn toggle_weekday(&mut self, name: &str) -> bool {
        let Some(day) = parse_weekday_name(name) else {
            return false;
        };
        let before = self.week_days.len();
        self.week_days
            .retain(|existing| parse_weekday_name(existing) != Some(day));
        if self.week_days.len() != before {
            return false;
        }
        self.week_days.push(weekday_name(day).to_string());
        true
    }

    /// Replaces the selection, canonicalizing names and dropping duplicates.
    pub fn set_week_days<I, T>(&mut self, names: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.week_days = normalize_week_days(names);
    }

    /// Checks what must hold before a save may be attempted.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.title.is_empty() {
            return Err(HabitValidationError::EmptyTitle);
        }
        if self.week_days.is_empty() {
            return Err(HabitValidationError::NoWeekDays);
        }
        if self.is_reminder_on && self.reminder_text.is_empty() {
            return Err(HabitValidationError::EmptyReminderText);
        }
        Ok(())
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub habit_id: HabitId,
    /// Whether a new record was created rather than an existing one updated.
    pub created: bool,
    pub notification_ids: Vec<String>,
    /// Weekday names that could not be scheduled.
    pub unresolved_week_days: Vec<String>,
}

/// View-model for creating, editing and deleting habits.
///
/// `save` and `delete` take `&mut self`, so one editor never runs two of them
/// at once. Share an editor between tasks through `SharedHabitEditor`.
pub struct HabitEditor<N: NotificationCenter> {
    center: N,
    config: EditorConfig,
    state: EditorState,
    notification_access: bool,
}

impl<N: NotificationCenter> HabitEditor<N> {
    pub fn new(center: N, config: EditorConfig) -> Self {
        let state = EditorState::with_defaults(&config);
        Self {
            center,
            config,
            state,
            notification_access: false,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn notification_center(&self) -> &N {
        &self.center
    }

    /// Last answer from the notification center. Never gates saving.
    pub fn notification_access(&self) -> bool {
        self.notification_access
    }

    /// Presentation applied when a reminder fires while the app is foregrounded.
    pub fn foreground_presentation(&self) -> PresentationOptions {
        self.config.foreground_presentation
    }

    /// Installs the foreground presentation, then asks for notification
    /// access and records the answer. Called once at startup.
    pub async fn request_notification_access(&mut self) -> bool {
        self.center
            .set_foreground_presentation(self.config.foreground_presentation)
            .await;
        let granted = self
            .center
            .request_authorization(self.config.authorization)
            .await;
        self.notification_access = granted;
        info!("event=notification_access module=editor status=ok granted={granted}");
        granted
    }

    /// Fills the form from `habit` and makes it the edit target.
    pub fn load_for_edit(&mut self, habit: &Habit) {
        self.state = EditorState {
            title: habit.title.clone(),
            color: habit.color.clone(),
            week_days: habit.week_days.clone(),
            is_reminder_on: habit.is_reminder_on,
            reminder_text: habit.reminder_text.clone(),
            reminder_time: habit.notification_time,
            editing: Some(habit.clone()),
        };
    }

    /// Returns whether `save` would pass validation.
    pub fn can_save(&self) -> bool {
        self.state.validate().is_ok()
    }

    /// Restores the default form.
    pub fn reset(&mut self) {
        self.state = EditorState::with_defaults(&self.config);
    }

    /// Creates or updates a habit from the form.
    ///
    /// # Errors
    /// - `Validation` before any side effect.
    /// - `Scheduling` when a reminder registration fails; nothing is staged.
    /// - `Persistence` when the store commit fails. The attempted record,
    ///   with its freshly registered ids, becomes the edit target so a retry
    ///   cancels them first.
    pub async fn save<S: HabitStore + ?Sized>(&mut self, store: &mut S) -> EditorResult<SaveReport> {
        if let Err(err) = self.state.validate() {
            warn!("event=habit_save module=editor status=rejected reason={err}");
            return Err(EditorError::Validation(err));
        }

        let scheduler = ReminderScheduler::new(&self.center, &self.config.reminder);
        let created = self.state.editing.is_none();
        let mut record = match self.state.editing.as_mut() {
            Some(existing) => {
                if existing.has_outstanding_notifications() {
                    scheduler.cancel(&existing.notification_ids).await;
                    existing.notification_ids.clear();
                }
                existing.clone()
            }
            None => Habit::new(self.state.reminder_time),
        };

        record.title = self.state.title.clone();
        record.color = self.state.color.clone();
        record.week_days = normalize_week_days(&self.state.week_days);
        record.is_reminder_on = self.state.is_reminder_on;
        record.reminder_text = self.state.reminder_text.clone();
        record.notification_time = self.state.reminder_time;
        record.notification_ids = Vec::new();

        let mut unresolved_week_days = Vec::new();
        if record.is_reminder_on {
            let outcome = scheduler
                .schedule(
                    &record.week_days,
                    record.notification_time,
                    &record.reminder_text,
                )
                .await
                .map_err(EditorError::Scheduling)?;
            record.notification_ids = outcome.ids;
            unresolved_week_days = outcome.unresolved;
        }

        if let Err(err) = store.write(&record).and_then(|()| store.save()) {
            error!(
                "event=habit_save module=editor status=error created={created} reminders={} error={err}",
                record.notification_ids.len()
            );
            if record.has_outstanding_notifications() {
                self.state.editing = Some(record);
            }
            return Err(EditorError::Persistence(err));
        }

        info!(
            "event=habit_save module=editor status=ok created={created} reminders={} unresolved={}",
            record.notification_ids.len(),
            unresolved_week_days.len()
        );
        self.reset();
        Ok(SaveReport {
            habit_id: record.uuid,
            created,
            notification_ids: record.notification_ids,
            unresolved_week_days,
        })
    }

    /// Deletes the habit being edited after cancelling its reminders.
    ///
    /// The form is left as is; callers navigate away on success.
    ///
    /// # Errors
    /// - `NotEditing` with no store or notification calls made.
    /// - `Persistence` when the store commit fails.
    pub async fn delete<S: HabitStore + ?Sized>(&mut self, store: &mut S) -> EditorResult<HabitId> {
        let Some(habit) = self.state.editing.as_ref() else {
            return Err(EditorError::NotEditing);
        };

        if habit.is_reminder_on {
            ReminderScheduler::new(&self.center, &self.config.reminder)
                .cancel(&habit.notification_ids)
                .await;
        }

        let habit_id = habit.uuid;
        store.delete(habit_id);
        match store.save() {
            Ok(()) => {
                info!("event=habit_delete module=editor status=ok");
                Ok(habit_id)
            }
            Err(err) => {
                error!("event=habit_delete module=editor status=error error={err}");
                Err(EditorError::Persistence(err))
            }
        }
    }
}

/// Canonicalizes weekday names and drops duplicates, keeping first-seen order.
///
/// Unknown names are kept verbatim so scheduling can report them.
pub fn normalize_week_days<I, T>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref();
        let value = parse_weekday_name(name)
            .map(|day| weekday_name(day).to_string())
            .unwrap_or_else(|| name.to_string());
        if !normalized.contains(&value) {
            normalized.push(value);
        }
    }
    normalized
}
