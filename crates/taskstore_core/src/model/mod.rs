//! Domain model for the task store.
//!
//! # Responsibility
//! - Define the data shape persisted in the `tasks` table.
//!
//! # Invariants
//! - Every persisted task is identified by a unique numeric `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod task;
