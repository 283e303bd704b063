//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskstore_core` linkage and the configured database end to end.
//! - Keep output deterministic for quick local sanity checks.

use log::info;
use std::process::ExitCode;
use taskstore_core::db::migrations::current_version;
use taskstore_core::db::open_db_with_config;
use taskstore_core::{
    init_logging_from_config, SqliteTaskRepository, StoreConfig, TaskRepository,
};

fn main() -> ExitCode {
    println!("taskstore_core ping={}", taskstore_core::ping());
    println!("taskstore_core version={}", taskstore_core::core_version());

    match probe_store() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskstore probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn probe_store() -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    init_logging_from_config(&config)?;

    let conn = open_db_with_config(&config)?;
    let repo = SqliteTaskRepository::try_new(&conn)?;
    let tasks = repo.count()?;

    let mode = match config.db_path.as_deref() {
        Some(path) => path.display().to_string(),
        None => "memory".to_string(),
    };
    info!("event=cli_probe module=cli status=ok tasks={tasks}");
    println!("taskstore db={mode} schema_version={}", current_version(&conn)?);
    println!("taskstore tasks={tasks}");
    Ok(())
}
