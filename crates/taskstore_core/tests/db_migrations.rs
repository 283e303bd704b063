use rusqlite::Connection;
use taskstore_core::db::migrations::latest_version;
use taskstore_core::db::{open_db, open_db_in_memory, open_db_with_config, DbError};
use taskstore_core::{SqliteTaskRepository, StoreConfig, Task, TaskRepository};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tasks");
    assert_index_exists(&conn, "idx_tasks_status");
}

#[test]
fn opening_same_database_twice_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite3");

    let conn_first = open_db(&path).unwrap();
    let saved = SqliteTaskRepository::try_new(&conn_first)
        .unwrap()
        .save(&Task::new("persisted", "open"))
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteTaskRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.find_by_id(saved.id.unwrap()).unwrap(), Some(saved));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_db_with_config_uses_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.sqlite3");
    let config = StoreConfig {
        db_path: Some(path.clone()),
        busy_timeout_ms: 100,
        ..StoreConfig::default()
    };

    let conn = open_db_with_config(&config).unwrap();
    assert_table_exists(&conn, "tasks");
    assert!(path.exists());
}

#[test]
fn open_db_with_default_config_is_in_memory() {
    let conn = open_db_with_config(&StoreConfig::default()).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(conn.path().map_or(true, |path| path.is_empty()));
}

#[test]
fn open_db_with_oversized_busy_timeout_opens_with_capped_value() {
    let config = StoreConfig {
        busy_timeout_ms: 3_000_000_000,
        ..StoreConfig::default()
    };

    let conn = open_db_with_config(&config).unwrap();
    let applied: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, i64::from(i32::MAX));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
