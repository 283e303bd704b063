//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted entity of the task store.
//! - Provide builder-style helpers and pre-persistence validation.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one; a set id is strictly positive.
//! - `status` is free-form and may be empty. No enumeration is enforced here.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Numeric row identity assigned by the store.
pub type TaskId = i64;

/// Validation failure for task state that must never reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Ids are assigned from 1 upwards; zero and negatives are never valid.
    NonPositiveId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "task id must be positive, got {id}"),
        }
    }
}

impl Error for TaskValidationError {}

/// A unit of work tracked by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// `None` for a task that has never been saved.
    #[serde(default)]
    pub id: Option<TaskId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Application-defined state such as `open` or `done`.
    pub status: String,
}

impl Task {
    /// Creates an unsaved task.
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            status: status.into(),
        }
    }

    /// Creates a task carrying a caller-chosen id.
    ///
    /// Saving it updates the row with that id, or inserts one if none exists.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        status: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: Some(id),
            ..Self::new(title, status)
        };
        task.validate()?;
        Ok(task)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks invariants that storage relies on.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        match self.id {
            Some(id) if id <= 0 => Err(TaskValidationError::NonPositiveId(id)),
            _ => Ok(()),
        }
    }

    /// Returns whether this task has been assigned a store id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
