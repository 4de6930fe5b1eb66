//! Weekday reminder scheduling.
//!
//! # Responsibility
//! - Derive one recurring calendar trigger per selected weekday.
//! - Register triggers with the notification center under fresh ids.
//!
//! # Invariants
//! - Only hour and minute of the reminder time reach the trigger.
//! - A failed call leaves none of its own registrations outstanding.
//! - Unresolvable weekday names produce no id and are reported back.

use crate::config::ReminderConfig;
use crate::model::weekday::{parse_weekday_name, trigger_index};
use crate::notify::{
    CalendarTrigger, NotificationCenter, NotificationContent, NotificationError,
    NotificationRequest,
};
use chrono::{NaiveTime, Timelike};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Triggers derived from a weekday selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerPlan {
    /// One trigger per distinct resolved weekday, in selection order.
    pub triggers: Vec<CalendarTrigger>,
    /// Names that matched no weekday.
    pub unresolved: Vec<String>,
}

/// Result of a fully successful `schedule` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOutcome {
    /// Registered ids, in registration order.
    pub ids: Vec<String>,
    pub unresolved: Vec<String>,
}

/// Registration failure; earlier registrations of the call were cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingError {
    /// Trigger index of the weekday whose registration failed.
    pub weekday: u32,
    /// Number of registrations from the same call that were cancelled.
    pub rolled_back: usize,
    pub source: NotificationError,
}

impl Display for SchedulingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to schedule reminder for weekday {} ({} earlier registrations cancelled): {}",
            self.weekday, self.rolled_back, self.source
        )
    }
}

impl Error for SchedulingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Builds the trigger plan for `week_days` at `time`.
///
/// Pure derivation; duplicate weekdays collapse onto the first occurrence.
pub fn plan_triggers(week_days: &[String], time: NaiveTime) -> TriggerPlan {
    let mut plan = TriggerPlan::default();
    let mut planned = HashSet::new();

    for name in week_days {
        match parse_weekday_name(name) {
            Some(day) => {
                let weekday = trigger_index(day);
                if planned.insert(weekday) {
                    plan.triggers.push(CalendarTrigger {
                        hour: time.hour(),
                        minute: time.minute(),
                        weekday,
                        repeats: true,
                    });
                }
            }
            None => plan.unresolved.push(name.clone()),
        }
    }

    plan
}

/// Registers weekday reminders with a notification center.
pub struct ReminderScheduler<'a, N: NotificationCenter + ?Sized> {
    center: &'a N,
    config: &'a ReminderConfig,
}

impl<'a, N: NotificationCenter + ?Sized> ReminderScheduler<'a, N> {
    pub fn new(center: &'a N, config: &'a ReminderConfig) -> Self {
        Self { center, config }
    }

    /// Schedules one repeating reminder per weekday in `week_days`.
    ///
    /// Registrations are awaited one by one. On the first failure every id
    /// registered earlier in this call is cancelled before the error returns.
    ///
    /// # Errors
    /// - `SchedulingError` carrying the notification center's refusal.
    pub async fn schedule(
        &self,
        week_days: &[String],
        time: NaiveTime,
        body: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let plan = plan_triggers(week_days, time);
        if !plan.unresolved.is_empty() {
            warn!(
                "event=reminder_schedule module=scheduler status=warn reason=unresolved_weekday count={}",
                plan.unresolved.len()
            );
        }

        let content = NotificationContent {
            title: self.config.notification_title.clone(),
            subtitle: body.to_string(),
            sound: self.config.play_sound,
        };

        let mut ids: Vec<String> = Vec::with_capacity(plan.triggers.len());
        for trigger in plan.triggers {
            let id = Uuid::new_v4().to_string();
            let request = NotificationRequest {
                id: id.clone(),
                trigger,
                content: content.clone(),
            };

            if let Err(source) = self.center.register(request).await {
                self.cancel(&ids).await;
                error!(
                    "event=reminder_schedule module=scheduler status=error weekday={} rolled_back={} error={}",
                    trigger.weekday,
                    ids.len(),
                    source
                );
                return Err(SchedulingError {
                    weekday: trigger.weekday,
                    rolled_back: ids.len(),
                    source,
                });
            }
            ids.push(id);
        }

        info!(
            "event=reminder_schedule module=scheduler status=ok registered={} hour={} minute={}",
            ids.len(),
            time.hour(),
            time.minute()
        );
        Ok(ScheduleOutcome {
            ids,
            unresolved: plan.unresolved,
        })
    }

    /// Cancels previously registered ids. Empty input issues no call.
    pub async fn cancel(&self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        self.center.cancel(ids).await;
    }
}

#[cfg(test)]
mod tests {
    use super::plan_triggers;
    use chrono::NaiveTime;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn plan_discards_date_and_seconds() {
        let time = NaiveTime::from_hms_opt(7, 45, 59).unwrap();
        let plan = plan_triggers(&names(&["Friday"]), time);
        assert_eq!(plan.triggers.len(), 1);
        assert_eq!(plan.triggers[0].hour, 7);
        assert_eq!(plan.triggers[0].minute, 45);
        assert_eq!(plan.triggers[0].weekday, 6);
        assert!(plan.triggers[0].repeats);
    }

    #[test]
    fn plan_reports_unresolved_names() {
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let plan = plan_triggers(&names(&["Funday", "Sunday"]), time);
        assert_eq!(plan.unresolved, names(&["Funday"]));
        assert_eq!(plan.triggers.len(), 1);
        assert_eq!(plan.triggers[0].weekday, 1);
    }

    #[test]
    fn plan_collapses_duplicate_weekdays() {
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let plan = plan_triggers(&names(&["Monday", "monday"]), time);
        assert_eq!(plan.triggers.len(), 1);
        assert!(plan.unresolved.is_empty());
    }
}
