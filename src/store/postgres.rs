//! PostgreSQL store backends.
//!
//! Every call runs under a deadline (`tokio::time::timeout`); a call that overruns
//! fails with [`StoreError::Timeout`] and is dropped, which also cancels the
//! in-flight query.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CredentialStore, Page, StoreError, StoreResult, TodoStore};
use crate::models::{Todo, User};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS todos (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        due_date TIMESTAMPTZ NOT NULL,
        done BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS todos_created_at_idx ON todos (created_at DESC)",
];

async fn with_deadline<T, F>(deadline: Duration, op: &'static str, fut: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(sqlx::Error::RowNotFound)) => Err(StoreError::NotFound),
        Ok(Err(e)) => {
            let err = StoreError::from(e);
            if let StoreError::Backend(msg) = &err {
                log::error!("{} failed: {}", op, msg);
            }
            Err(err)
        }
        Err(_) => {
            log::warn!("{} exceeded its {:?} deadline", op, deadline);
            Err(StoreError::Timeout)
        }
    }
}

/// Creates the tables and indexes the stores need, if missing.
pub async fn ensure_schema(pool: &PgPool, deadline: Duration) -> StoreResult<()> {
    for statement in SCHEMA {
        with_deadline(deadline, "ensure_schema", sqlx::query(*statement).execute(pool)).await?;
    }
    Ok(())
}

/// Escapes `LIKE` metacharacters and wraps the needle for a substring match.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
    deadline: Duration,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let insert = sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
            .bind(&user.username)
            .bind(&user.password_hash)
            .execute(&self.pool);
        with_deadline(self.deadline, "create_user", insert).await?;
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        let select = sqlx::query_as::<_, User>(
            "SELECT username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool);
        with_deadline(self.deadline, "get_user_by_username", select).await
    }
}

#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
    deadline: Duration,
}

impl PgTodoStore {
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn save(&self, todo: &Todo) -> StoreResult<()> {
        let upsert = sqlx::query(
            "INSERT INTO todos (id, title, due_date, done)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE
             SET title = EXCLUDED.title, due_date = EXCLUDED.due_date,
                 done = EXCLUDED.done, updated_at = now()",
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(todo.due_date)
        .bind(todo.done)
        .execute(&self.pool);
        with_deadline(self.deadline, "save", upsert).await?;
        Ok(())
    }

    async fn find_all(&self, page: i64, limit: i64, title: &str) -> StoreResult<Page<Todo>> {
        let pattern = like_pattern(title);

        let count = sqlx::query_scalar::<_, i64>(
            r"SELECT COUNT(*) FROM todos WHERE title ILIKE $1 ESCAPE '\'",
        )
        .bind(&pattern)
        .fetch_one(&self.pool);
        let total = with_deadline(self.deadline, "count_todos", count).await?;

        if page < 0 || limit <= 0 {
            return Ok(Page::empty(total));
        }
        let offset = match page.checked_mul(limit) {
            Some(offset) if offset < total => offset,
            _ => return Ok(Page::empty(total)),
        };

        let select = sqlx::query_as::<_, Todo>(
            r"SELECT id, title, due_date, done FROM todos
              WHERE title ILIKE $1 ESCAPE '\'
              ORDER BY created_at DESC, id
              LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool);
        let items = with_deadline(self.deadline, "find_all", select).await?;

        Ok(Page { items, total })
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Todo> {
        let select =
            sqlx::query_as::<_, Todo>("SELECT id, title, due_date, done FROM todos WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool);
        with_deadline(self.deadline, "find_by_id", select).await
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        let delete = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool);
        let result = with_deadline(self.deadline, "delete_by_id", delete).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_by_id(&self, todo: &Todo) -> StoreResult<()> {
        let update = sqlx::query(
            "UPDATE todos SET title = $1, due_date = $2, done = $3, updated_at = now()
             WHERE id = $4",
        )
        .bind(&todo.title)
        .bind(todo.due_date)
        .bind(todo.done)
        .bind(todo.id)
        .execute(&self.pool);
        let result = with_deadline(self.deadline, "update_by_id", update).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
