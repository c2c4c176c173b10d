//! To-do repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `list_all` is always newest-id-first (`tno DESC`); a request sort is
//!   not applied.
//! - `get_todo_dto` returns the member's newest to-do when several exist.

use super::page::{count_to_total, Page, PageRequest};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::dto::todo_dto::TodoDto;
use crate::model::todo::{MemberId, Todo, TodoId};
use rusqlite::{params, Connection, Row};

const TODO_SELECT_SQL: &str = "SELECT
    tno,
    mno,
    title,
    writer,
    due_date,
    complete
FROM tbl_todo";

/// Repository interface for to-do operations.
pub trait TodoRepository {
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId>;
    fn get_todo(&self, tno: TodoId) -> RepoResult<Option<Todo>>;
    /// Looks a to-do up by its owning member.
    fn get_todo_dto(&self, mno: MemberId) -> RepoResult<Option<TodoDto>>;
    fn update_todo(&self, todo: &Todo) -> RepoResult<()>;
    fn delete_todo(&self, tno: TodoId) -> RepoResult<()>;
    fn list_all(&self, request: &PageRequest) -> RepoResult<Page<Todo>>;
}

/// SQLite-backed to-do repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tbl_todo"])?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
        todo.validate()?;

        self.conn.execute(
            "INSERT INTO tbl_todo (mno, title, writer, due_date, complete)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                todo.mno,
                todo.title.as_str(),
                todo.writer.as_str(),
                todo.due_date,
                bool_to_int(todo.complete),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_todo(&self, tno: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE tno = ?1;"))?;
        let mut rows = stmt.query([tno])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(todo_from_row(row)?));
        }
        Ok(None)
    }

    fn get_todo_dto(&self, mno: MemberId) -> RepoResult<Option<TodoDto>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE mno = ?1
             ORDER BY tno DESC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([mno])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(TodoDto::from(todo_from_row(row)?)));
        }
        Ok(None)
    }

    fn update_todo(&self, todo: &Todo) -> RepoResult<()> {
        let tno = todo.tno.ok_or(RepoError::NotPersisted("tbl_todo"))?;
        todo.validate()?;

        let changed = self.conn.execute(
            "UPDATE tbl_todo
             SET
                title = ?1,
                writer = ?2,
                due_date = ?3,
                complete = ?4
             WHERE tno = ?5;",
            params![
                todo.title.as_str(),
                todo.writer.as_str(),
                todo.due_date,
                bool_to_int(todo.complete),
                tno,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "tbl_todo",
                id: tno,
            });
        }
        Ok(())
    }

    fn delete_todo(&self, tno: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tbl_todo WHERE tno = ?1;", [tno])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "tbl_todo",
                id: tno,
            });
        }
        Ok(())
    }

    fn list_all(&self, request: &PageRequest) -> RepoResult<Page<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             ORDER BY tno DESC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![request.limit(), request.offset()])?;
        let mut content = Vec::new();
        while let Some(row) = rows.next()? {
            content.push(todo_from_row(row)?);
        }

        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tbl_todo;", [], |row| row.get(0))?;
        Ok(Page::new(content, request, count_to_total(count)?))
    }
}

fn todo_from_row(row: &Row<'_>) -> RepoResult<Todo> {
    let complete = match row.get::<_, i64>("complete")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid complete value `{other}` in tbl_todo.complete"
            )));
        }
    };

    Ok(Todo {
        tno: Some(row.get("tno")?),
        mno: row.get("mno")?,
        title: row.get("title")?,
        writer: row.get("writer")?,
        due_date: row.get("due_date")?,
        complete,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
