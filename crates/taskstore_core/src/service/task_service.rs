//! Task use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for callers of the task store.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{RepoResult, TaskPage, TaskPageRequest, TaskRepository};

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and persists a new task, returning it with its assigned id.
    pub fn create_task(
        &self,
        title: impl Into<String>,
        status: impl Into<String>,
    ) -> RepoResult<Task> {
        self.repo.save(&Task::new(title, status))
    }

    /// Rewrites the status of an existing task.
    ///
    /// Returns `None` without writing when `id` does not exist. The read and
    /// the write are separate statements; wrap the call in a transaction when
    /// concurrent writers must not interleave.
    pub fn set_status(&self, id: TaskId, status: impl Into<String>) -> RepoResult<Option<Task>> {
        let Some(mut task) = self.repo.find_by_id(id)? else {
            return Ok(None);
        };
        task.status = status.into();
        self.repo.save(&task).map(Some)
    }

    pub fn save(&self, task: &Task) -> RepoResult<Task> {
        self.repo.save(task)
    }

    pub fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.find_by_id(id)
    }

    pub fn find_all(&self) -> RepoResult<Vec<Task>> {
        self.repo.find_all()
    }

    pub fn find_page(&self, request: &TaskPageRequest) -> RepoResult<TaskPage> {
        self.repo.find_page(request)
    }

    pub fn find_by_status(&self, status: &str) -> RepoResult<Vec<Task>> {
        self.repo.find_by_status(status)
    }

    pub fn delete_by_id(&self, id: TaskId) -> RepoResult<bool> {
        self.repo.delete_by_id(id)
    }

    pub fn exists_by_id(&self, id: TaskId) -> RepoResult<bool> {
        self.repo.exists_by_id(id)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count()
    }
}
