//! Habit use-case services.
//!
//! # Responsibility
//! - Orchestrate reminder scheduling and store commits for the edit form.
//! - Keep presentation callers decoupled from storage and notification details.

pub mod habit_editor;
pub mod reminder_scheduler;
pub mod shared_editor;
