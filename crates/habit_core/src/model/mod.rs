//! Habit domain model.
//!
//! # Responsibility
//! - Define the persisted habit record and its invariants.
//! - Own the locale-independent weekday vocabulary.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - Weekdays are persisted by canonical English name.

pub mod habit;
pub mod weekday;
