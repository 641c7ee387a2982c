use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::Todo;
use crate::store::{Page, StoreError, TodoStore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses a due date given either as an RFC 3339 timestamp or as a bare
/// `YYYY-MM-DD` date (taken as midnight UTC).
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, TodoError> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            TodoError::Validation(format!(
                "invalid dueDate {:?}: expected an RFC 3339 timestamp or YYYY-MM-DD",
                input
            ))
        })
}

/// Todo operations over whichever [`TodoStore`] the server was started with.
pub struct TodoUseCase {
    store: Arc<dyn TodoStore>,
}

impl TodoUseCase {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Validates the date, assigns a fresh id and saves. Returns the stored record.
    pub async fn create_todo(
        &self,
        title: &str,
        due_date: &str,
        done: bool,
    ) -> Result<Todo, TodoError> {
        let due_date = parse_due_date(due_date)?;
        let todo = Todo::new(title.to_string(), due_date, done);
        self.store.save(&todo).await?;
        Ok(todo)
    }

    pub async fn get_all_todos(
        &self,
        page: i64,
        limit: i64,
        title: &str,
    ) -> Result<Page<Todo>, TodoError> {
        Ok(self.store.find_all(page, limit, title).await?)
    }

    pub async fn get_todo_by_id(&self, id: Uuid) -> Result<Todo, TodoError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn delete_todo(&self, id: Uuid) -> Result<(), TodoError> {
        Ok(self.store.delete_by_id(id).await?)
    }

    /// Replaces title, due date and done flag of an existing todo.
    pub async fn update_todo(
        &self,
        id: Uuid,
        title: &str,
        due_date: &str,
        done: bool,
    ) -> Result<(), TodoError> {
        let due_date = parse_due_date(due_date)?;
        let todo = Todo {
            id,
            title: title.to_string(),
            due_date,
            done,
        };
        Ok(self.store.update_by_id(&todo).await?)
    }
}
