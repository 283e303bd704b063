//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for tasks.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Task::validate()` before persistence.
//! - Absent rows surface as `None`/empty results, never as errors.

pub mod task_repo;
