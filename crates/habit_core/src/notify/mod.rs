//! Notification service boundary.
//!
//! # Responsibility
//! - Define the request shape handed to the OS-level notification service.
//! - Define the async contract the core needs from that service.
//!
//! # Invariants
//! - Every request carries a caller-generated unique id.
//! - Cancellation is best-effort and never reports failure.
//! - Foreground deliveries are suppressed until a presentation is installed.

use crate::config::{AuthorizationOptions, PresentationOptions};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;

pub use memory::{CallCounts, Delivery, InMemoryNotificationCenter, DEFAULT_PENDING_LIMIT};

/// Recurring calendar-match trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTrigger {
    pub hour: u32,
    pub minute: u32,
    /// 1 = Sunday, 7 = Saturday.
    pub weekday: u32,
    pub repeats: bool,
}

/// Displayed notification content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub subtitle: String,
    pub sound: bool,
}

/// One schedule request keyed by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub id: String,
    pub trigger: CalendarTrigger,
    pub content: NotificationContent,
}

/// Registration failures reported by a notification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The user denied (or never granted) notification access.
    NotAuthorized,
    /// The service refuses more pending requests.
    PendingLimitReached { limit: usize },
    /// Service-specific rejection.
    Rejected(String),
}

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthorized => write!(f, "notification access not granted"),
            Self::PendingLimitReached { limit } => {
                write!(f, "pending notification limit of {limit} reached")
            }
            Self::Rejected(reason) => write!(f, "notification request rejected: {reason}"),
        }
    }
}

impl Error for NotificationError {}

/// Async contract of the local notification service.
#[async_trait]
pub trait NotificationCenter: Send + Sync {
    /// Asks the user for notification access. Returns whether it was granted.
    async fn request_authorization(&self, options: AuthorizationOptions) -> bool;

    /// Installs how requests that fire while the app is foregrounded are shown.
    async fn set_foreground_presentation(&self, options: PresentationOptions);

    /// Registers one request. Re-using an id replaces the earlier request.
    async fn register(&self, request: NotificationRequest) -> Result<(), NotificationError>;

    /// Removes pending requests. Unknown ids are ignored.
    async fn cancel(&self, ids: &[String]);
}

#[async_trait]
impl<T: NotificationCenter + ?Sized> NotificationCenter for std::sync::Arc<T> {
    async fn request_authorization(&self, options: AuthorizationOptions) -> bool {
        (**self).request_authorization(options).await
    }

    async fn set_foreground_presentation(&self, options: PresentationOptions) {
        (**self).set_foreground_presentation(options).await
    }

    async fn register(&self, request: NotificationRequest) -> Result<(), NotificationError> {
        (**self).register(request).await
    }

    async fn cancel(&self, ids: &[String]) {
        (**self).cancel(ids).await
    }
}
