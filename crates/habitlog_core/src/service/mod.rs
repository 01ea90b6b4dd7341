//! Core use-case services.
//!
//! # Responsibility
//! - `state_store`: habit registry and completion log with persistence.
//! - `streak` / `progress`: pure statistics recomputed from the log.

pub mod progress;
pub mod state_store;
pub mod streak;
