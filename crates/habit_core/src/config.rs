//! Editor and reminder configuration.
//!
//! # Responsibility
//! - Hold defaults the editor falls back to on reset.
//! - State the notification presentation policy explicitly.
//!
//! # Invariants
//! - `Default` values reproduce the stock app behavior.

use crate::model::habit::DEFAULT_HABIT_COLOR;
use chrono::NaiveTime;

const DEFAULT_NOTIFICATION_TITLE: &str = "Habit Reminder";
const DEFAULT_REMINDER_HOUR: u32 = 9;

/// How a delivered notification is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentationOptions {
    pub sound: bool,
    pub banner: bool,
    pub badge: bool,
    pub list: bool,
}

impl PresentationOptions {
    /// Sound plus banner, used while the app is in the foreground.
    pub fn sound_and_banner() -> Self {
        Self {
            sound: true,
            banner: true,
            ..Self::default()
        }
    }

    /// Returns whether the notification would be visible or audible at all.
    pub fn is_suppressed(&self) -> bool {
        !(self.sound || self.banner || self.badge || self.list)
    }
}

/// Capabilities requested from the notification service at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    pub sound: bool,
    pub alert: bool,
    pub badge: bool,
}

impl Default for AuthorizationOptions {
    fn default() -> Self {
        Self {
            sound: true,
            alert: true,
            badge: true,
        }
    }
}

/// Content settings shared by every scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderConfig {
    /// Fixed title; the habit's reminder text becomes the subtitle.
    pub notification_title: String,
    pub play_sound: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            notification_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            play_sound: true,
        }
    }
}

/// Habit editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub default_color: String,
    /// Reminder time shown in a fresh form.
    pub default_reminder_time: NaiveTime,
    pub reminder: ReminderConfig,
    /// Applied when a reminder fires while the app is foregrounded.
    pub foreground_presentation: PresentationOptions,
    pub authorization: AuthorizationOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_HABIT_COLOR.to_string(),
            default_reminder_time: NaiveTime::from_hms_opt(DEFAULT_REMINDER_HOUR, 0, 0)
                .unwrap_or_default(),
            reminder: ReminderConfig::default(),
            foreground_presentation: PresentationOptions::sound_and_banner(),
            authorization: AuthorizationOptions::default(),
        }
    }
}
