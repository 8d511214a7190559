//! Task CRUD operations.

use super::{Database, now_iso};
use crate::types::{NewTask, Task, TaskChanges, finish_at_for};
use anyhow::Result;
use rusqlite::{Row, params};

const TASK_COLUMNS: &str = "id, title, description, status, created_at, finish_at";

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
        finish_at: row.get("finish_at")?,
    })
}

impl Database {
    /// List every task, newest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
            ))?;

            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(tasks)
        })
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;

            match stmt.query_row(params![id], parse_task_row) {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Insert a task and return it with its assigned ID.
    ///
    /// `finish_at` is always stored as NULL here, whatever the status.
    pub fn create_task(&self, task: NewTask) -> Result<Task> {
        let created_at = now_iso();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, status, created_at, finish_at)
                 VALUES (?1, ?2, ?3, ?4, NULL)",
                params![task.title, task.description, task.status, created_at],
            )?;

            Ok(Task {
                id: conn.last_insert_rowid(),
                title: task.title,
                description: Some(task.description),
                status: task.status,
                created_at,
                finish_at: None,
            })
        })
    }

    /// Overwrite a task's fields and recompute `finish_at` from the new status.
    ///
    /// Returns `false` when no task has the given ID. A NULL `title` or
    /// `status` on an existing row fails with a constraint violation.
    pub fn update_task(&self, id: i64, changes: TaskChanges) -> Result<bool> {
        let now = now_iso();
        let finish_at = changes
            .status
            .as_deref()
            .and_then(|status| finish_at_for(status, &now));

        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE tasks SET title = ?1, description = ?2, status = ?3, finish_at = ?4
                 WHERE id = ?5",
                params![
                    changes.title,
                    changes.description,
                    changes.status,
                    finish_at,
                    id
                ],
            )?;

            Ok(updated > 0)
        })
    }

    /// Delete a task. Returns `false` when no task has the given ID.
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
    }

    /// Number of stored tasks.
    pub fn task_count(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            Ok(count)
        })
    }
}
