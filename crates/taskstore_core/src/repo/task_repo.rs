//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, paging and the by-status lookup over the `tasks` table.
//! - Keep every SQL statement inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before any SQL mutation.
//! - Missing rows are never errors: reads return `None`/empty, deletes no-op.
//! - Non-positive ids are answered as absent without issuing SQL.
//! - Status matching is exact and case-sensitive.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskValidationError};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_TABLE: &str = "tasks";

const TASK_COLUMNS: [&str; 6] = [
    "id",
    "title",
    "description",
    "status",
    "created_at",
    "updated_at",
];

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    status
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Task rejected before reaching storage.
    Validation(TaskValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted row cannot be converted to a valid `Task`.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "task repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "task repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "task repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Column used to order a page of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSortField {
    #[default]
    Id,
    Title,
    Status,
}

/// Direction applied to the primary sort column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Page ordering. Non-id fields fall back to `id ASC` on ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSort {
    pub field: TaskSortField,
    pub direction: SortDirection,
}

impl TaskSort {
    pub fn by(field: TaskSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Paging options for `find_page`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPageRequest {
    /// Maximum rows to return. `None` means unbounded.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
    pub sort: TaskSort,
}

/// One page of tasks plus the unpaged row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub total: u64,
    pub offset: u32,
    pub limit: Option<u32>,
}

impl TaskPage {
    /// Returns whether rows remain after this page.
    pub fn has_next(&self) -> bool {
        u64::from(self.offset) + (self.items.len() as u64) < self.total
    }
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Inserts a new task or overwrites the row sharing its id.
    fn save(&self, task: &Task) -> RepoResult<Task>;
    /// Loads one task by id.
    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Loads every task ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Task>>;
    /// Loads one sorted page of tasks.
    fn find_page(&self, request: &TaskPageRequest) -> RepoResult<TaskPage>;
    /// Loads tasks whose status equals `status` exactly.
    fn find_by_status(&self, status: &str) -> RepoResult<Vec<Task>>;
    /// Deletes one task; returns whether a row was removed.
    fn delete_by_id(&self, id: TaskId) -> RepoResult<bool>;
    /// Returns whether a task with `id` is stored.
    fn exists_by_id(&self, id: TaskId) -> RepoResult<bool>;
    /// Returns the number of stored tasks.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` differs from the latest migration.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_task_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn save(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        let id = match task.id {
            None => {
                self.conn.execute(
                    "INSERT INTO tasks (title, description, status)
                     VALUES (?1, ?2, ?3);",
                    params![
                        task.title.as_str(),
                        task.description.as_deref(),
                        task.status.as_str(),
                    ],
                )?;
                let id = self.conn.last_insert_rowid();
                debug!("event=task_save module=repo status=ok mode=insert id={id}");
                id
            }
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO tasks (id, title, description, status)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        description = excluded.description,
                        status = excluded.status,
                        updated_at = (strftime('%s', 'now') * 1000);",
                    params![
                        id,
                        task.title.as_str(),
                        task.description.as_deref(),
                        task.status.as_str(),
                    ],
                )?;
                debug!("event=task_save module=repo status=ok mode=upsert id={id}");
                id
            }
        };

        Ok(Task {
            id: Some(id),
            ..task.clone()
        })
    }

    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        if !is_assignable_id(id) {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Task>> {
        self.find_page(&TaskPageRequest::default())
            .map(|page| page.items)
    }

    fn find_page(&self, request: &TaskPageRequest) -> RepoResult<TaskPage> {
        let total = self.count()?;

        let mut sql = format!("{TASK_SELECT_SQL} {}", order_by_clause(request.sort));
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = request.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if request.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(request.offset)));
            }
        } else if request.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(request.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query(params_from_iter(bind_values))?;
        let items = collect_tasks(rows)?;

        Ok(TaskPage {
            items,
            total,
            offset: request.offset,
            limit: request.limit,
        })
    }

    fn find_by_status(&self, status: &str) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE status = ?1
             ORDER BY id ASC;"
        ))?;
        let rows = stmt.query([status])?;
        collect_tasks(rows)
    }

    fn delete_by_id(&self, id: TaskId) -> RepoResult<bool> {
        if !is_assignable_id(id) {
            return Ok(false);
        }

        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        debug!("event=task_delete module=repo status=ok id={id} rows={changed}");
        Ok(changed > 0)
    }

    fn exists_by_id(&self, id: TaskId) -> RepoResult<bool> {
        if !is_assignable_id(id) {
            return Ok(false);
        }

        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

/// Ids below 1 are never stored, so lookups on them skip SQL entirely.
fn is_assignable_id(id: TaskId) -> bool {
    id > 0
}

fn order_by_clause(sort: TaskSort) -> String {
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    match sort.field {
        TaskSortField::Id => format!("ORDER BY id {direction}"),
        TaskSortField::Title => format!("ORDER BY title {direction}, id ASC"),
        TaskSortField::Status => format!("ORDER BY status {direction}, id ASC"),
    }
}

fn collect_tasks(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<Task>> {
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let task = Task {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
    };
    task.validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} in {TASK_TABLE}.id")))?;
    Ok(task)
}

fn ensure_task_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, TASK_TABLE)? {
        return Err(RepoError::MissingRequiredTable(TASK_TABLE));
    }

    for column in TASK_COLUMNS {
        if !table_has_column(conn, TASK_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: TASK_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{order_by_clause, SortDirection, TaskPage, TaskSort, TaskSortField};
    use crate::model::task::Task;

    #[test]
    fn order_by_breaks_ties_on_id_for_non_id_fields() {
        assert_eq!(order_by_clause(TaskSort::default()), "ORDER BY id ASC");
        assert_eq!(
            order_by_clause(TaskSort::by(TaskSortField::Status, SortDirection::Desc)),
            "ORDER BY status DESC, id ASC"
        );
    }

    #[test]
    fn has_next_compares_consumed_rows_against_total() {
        let page = TaskPage {
            items: vec![Task::new("a", "open"), Task::new("b", "open")],
            total: 5,
            offset: 2,
            limit: Some(2),
        };
        assert!(page.has_next());

        let last = TaskPage {
            offset: 3,
            ..page
        };
        assert!(!last.has_next());
    }
}
