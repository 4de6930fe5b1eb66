#![allow(dead_code)]

use async_trait::async_trait;
use habit_core::{
    AuthorizationOptions, Habit, HabitId, HabitStore, InMemoryNotificationCenter,
    NotificationCenter, NotificationError, NotificationRequest, PresentationOptions, RepoError,
    RepoResult,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory `HabitStore` that records calls and can refuse commits.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub committed: BTreeMap<HabitId, Habit>,
    staged_writes: Vec<Habit>,
    staged_deletes: Vec<HabitId>,
    pub fail_saves: bool,
    pub write_calls: usize,
    pub delete_calls: usize,
    pub save_calls: usize,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.write_calls + self.delete_calls + self.save_calls
    }
}

impl HabitStore for RecordingStore {
    fn write(&mut self, habit: &Habit) -> RepoResult<()> {
        self.write_calls += 1;
        habit.validate()?;
        self.staged_writes.push(habit.clone());
        Ok(())
    }

    fn delete(&mut self, id: HabitId) {
        self.delete_calls += 1;
        self.staged_deletes.push(id);
    }

    fn save(&mut self) -> RepoResult<()> {
        self.save_calls += 1;
        let writes = std::mem::take(&mut self.staged_writes);
        let deletes = std::mem::take(&mut self.staged_deletes);
        if self.fail_saves {
            return Err(RepoError::InvalidData("commit refused".to_string()));
        }
        for habit in writes {
            self.committed.insert(habit.uuid, habit);
        }
        for id in deletes {
            if self.committed.remove(&id).is_none() {
                return Err(RepoError::NotFound(id));
            }
        }
        Ok(())
    }

    fn has_pending_changes(&self) -> bool {
        !self.staged_writes.is_empty() || !self.staged_deletes.is_empty()
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        Ok(self.committed.get(&id).cloned())
    }

    fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        Ok(self.committed.values().cloned().collect())
    }
}

/// Authorized in-memory center whose registrations can be switched off.
#[derive(Debug, Default)]
pub struct SwitchableCenter {
    pub inner: InMemoryNotificationCenter,
    refusing: AtomicBool,
}

impl SwitchableCenter {
    pub fn authorized() -> Self {
        Self {
            inner: InMemoryNotificationCenter::authorized(),
            refusing: AtomicBool::new(false),
        }
    }

    pub fn refuse_registrations(&self, refuse: bool) {
        self.refusing.store(refuse, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationCenter for SwitchableCenter {
    async fn request_authorization(&self, options: AuthorizationOptions) -> bool {
        self.inner.request_authorization(options).await
    }

    async fn set_foreground_presentation(&self, options: PresentationOptions) {
        self.inner.set_foreground_presentation(options).await
    }

    async fn register(&self, request: NotificationRequest) -> Result<(), NotificationError> {
        if self.refusing.load(Ordering::SeqCst) {
            return Err(NotificationError::Rejected("service unavailable".to_string()));
        }
        self.inner.register(request).await
    }

    async fn cancel(&self, ids: &[String]) {
        self.inner.cancel(ids).await
    }
}

pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
