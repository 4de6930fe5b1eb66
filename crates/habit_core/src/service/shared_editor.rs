//! Single-flight handle for editors shared between tasks.
//!
//! # Invariants
//! - At most one save or delete runs per editor; a second one is rejected
//!   with `EditorError::Busy` rather than queued.
//! - Form edits wait for an in-flight save or delete to finish.

use crate::model::habit::HabitId;
use crate::notify::NotificationCenter;
use crate::repo::habit_store::HabitStore;
use crate::service::habit_editor::{EditorError, EditorResult, HabitEditor, SaveReport};
use log::warn;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable handle to one `HabitEditor`.
pub struct SharedHabitEditor<N: NotificationCenter> {
    inner: Arc<Mutex<HabitEditor<N>>>,
}

impl<N: NotificationCenter> Clone for SharedHabitEditor<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: NotificationCenter> SharedHabitEditor<N> {
    pub fn new(editor: HabitEditor<N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(editor)),
        }
    }

    /// Runs `save`, or fails with `Busy` if another action holds the editor.
    pub async fn save<S: HabitStore + ?Sized>(&self, store: &mut S) -> EditorResult<SaveReport> {
        let mut editor = self.try_acquire("save")?;
        editor.save(store).await
    }

    /// Runs `delete`, or fails with `Busy` if another action holds the editor.
    pub async fn delete<S: HabitStore + ?Sized>(&self, store: &mut S) -> EditorResult<HabitId> {
        let mut editor = self.try_acquire("delete")?;
        editor.delete(store).await
    }

    /// Applies `edit` to the editor once no action is in flight.
    pub async fn edit<R>(&self, edit: impl FnOnce(&mut HabitEditor<N>) -> R) -> R {
        let mut editor = self.inner.lock().await;
        edit(&mut editor)
    }

    fn try_acquire(
        &self,
        action: &'static str,
    ) -> EditorResult<tokio::sync::MutexGuard<'_, HabitEditor<N>>> {
        self.inner.try_lock().map_err(|_| {
            warn!("event=habit_{action} module=editor status=rejected reason=busy");
            EditorError::Busy
        })
    }
}
