//! Interchange encoders.
//!
//! # Responsibility
//! - `snapshot`: round-trippable JSON backup, also used as the stored record.
//! - `calendar`: one-way iCalendar reminder feed.

pub mod calendar;
pub mod snapshot;
