//! In-process notification center.
//!
//! # Responsibility
//! - Keep a pending-request registry with the same contract as the OS service.
//! - Match pending triggers against a wall-clock minute to produce deliveries.
//!
//! # Invariants
//! - Registration is refused until access has been granted.
//! - The registry never holds more than `pending_limit` requests.

use super::{NotificationCenter, NotificationError, NotificationRequest};
use crate::config::{AuthorizationOptions, PresentationOptions};
use crate::model::weekday::weekday_from_trigger_index;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Pending-request cap of the mobile notification service.
pub const DEFAULT_PENDING_LIMIT: usize = 64;

/// A request that fired, with the presentation applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub request: NotificationRequest,
    pub presentation: PresentationOptions,
}

/// Call counters, useful to assert that an operation stayed side-effect free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub authorization: usize,
    pub register: usize,
    pub cancel: usize,
}

#[derive(Debug, Default)]
struct CenterState {
    authorized: bool,
    foreground_presentation: PresentationOptions,
    pending: BTreeMap<String, NotificationRequest>,
    calls: CallCounts,
}

/// Registry-backed `NotificationCenter`.
#[derive(Debug)]
pub struct InMemoryNotificationCenter {
    grant_on_request: bool,
    pending_limit: usize,
    state: Mutex<CenterState>,
}

impl InMemoryNotificationCenter {
    /// Creates a center that grants access when asked.
    pub fn new() -> Self {
        Self {
            grant_on_request: true,
            pending_limit: DEFAULT_PENDING_LIMIT,
            state: Mutex::new(CenterState::default()),
        }
    }

    /// Creates a center where access is already granted.
    pub fn authorized() -> Self {
        let center = Self::new();
        center.lock().authorized = true;
        center
    }

    /// Makes the simulated user deny access on request.
    pub fn denying(mut self) -> Self {
        self.grant_on_request = false;
        self
    }

    pub fn with_pending_limit(mut self, limit: usize) -> Self {
        self.pending_limit = limit;
        self
    }

    pub fn is_authorized(&self) -> bool {
        self.lock().authorized
    }

    /// Returns pending requests ordered by id.
    pub fn pending_requests(&self) -> Vec<NotificationRequest> {
        self.lock().pending.values().cloned().collect()
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.lock().pending.keys().cloned().collect()
    }

    pub fn call_counts(&self) -> CallCounts {
        self.lock().calls
    }

    /// Returns every pending request whose trigger matches `at` to the minute.
    ///
    /// Foreground deliveries use the installed presentation, which is fully
    /// suppressed until one is set. Background deliveries are left to the
    /// system and always show sound and banner.
    pub fn deliveries_at(&self, at: NaiveDateTime, foreground: bool) -> Vec<Delivery> {
        let state = self.lock();
        let presentation = if foreground {
            state.foreground_presentation
        } else {
            PresentationOptions::sound_and_banner()
        };

        let deliveries = state
            .pending
            .values()
            .filter(|request| {
                weekday_from_trigger_index(request.trigger.weekday) == Some(at.weekday())
                    && request.trigger.hour == at.hour()
                    && request.trigger.minute == at.minute()
            })
            .map(|request| Delivery {
                request: request.clone(),
                presentation,
            })
            .collect();
        deliveries
    }

    fn lock(&self) -> MutexGuard<'_, CenterState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryNotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationCenter for InMemoryNotificationCenter {
    async fn request_authorization(&self, _options: AuthorizationOptions) -> bool {
        let mut state = self.lock();
        state.calls.authorization += 1;
        state.authorized = self.grant_on_request;
        state.authorized
    }

    async fn set_foreground_presentation(&self, options: PresentationOptions) {
        self.lock().foreground_presentation = options;
    }

    async fn register(&self, request: NotificationRequest) -> Result<(), NotificationError> {
        let mut state = self.lock();
        state.calls.register += 1;
        if !state.authorized {
            return Err(NotificationError::NotAuthorized);
        }
        if !state.pending.contains_key(&request.id) && state.pending.len() >= self.pending_limit {
            return Err(NotificationError::PendingLimitReached {
                limit: self.pending_limit,
            });
        }

        debug!(
            "event=notification_register module=notify status=ok weekday={} pending={}",
            request.trigger.weekday,
            state.pending.len() + 1
        );
        state.pending.insert(request.id.clone(), request);
        Ok(())
    }

    async fn cancel(&self, ids: &[String]) {
        let mut state = self.lock();
        state.calls.cancel += 1;
        let before = state.pending.len();
        for id in ids {
            state.pending.remove(id);
        }
        debug!(
            "event=notification_cancel module=notify status=ok requested={} removed={}",
            ids.len(),
            before - state.pending.len()
        );
    }
}
