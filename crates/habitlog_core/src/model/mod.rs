//! Domain model for habits and their completion log.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted shape identical to the JSON backup format.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - There is no hard delete; state only grows until replaced by an import.

pub mod habit;
pub mod tracker;
