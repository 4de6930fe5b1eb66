//! Habit persistence.
//!
//! # Responsibility
//! - Define the unit-of-work contract the editor commits through.
//! - Isolate SQLite details from editor orchestration.
//!
//! # Invariants
//! - Writes enforce `Habit::validate()` before they are staged.
//! - Repository APIs return semantic errors (`NotFound`) alongside DB errors.

pub mod habit_store;
