//! Core persistence layer for the task store.
//! Owns the `tasks` schema, its repository contract and the SQLite implementation.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::task_repo::{
    RepoError, RepoResult, SortDirection, SqliteTaskRepository, TaskPage, TaskPageRequest,
    TaskRepository, TaskSort, TaskSortField,
};
pub use service::task_service::TaskService;

/// Minimal health-check API for linkage probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
