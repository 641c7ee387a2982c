use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Default page size for `GET /todos` when `limit` is not given.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// A todo item as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Server-generated identifier (UUID v4). Never changes once assigned.
    pub id: Uuid,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub done: bool,
}

impl Todo {
    /// Builds a fresh record with a newly generated id.
    pub fn new(title: String, due_date: DateTime<Utc>, done: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            due_date,
            done,
        }
    }
}

/// Request body for creating or replacing a todo.
///
/// `dueDate` is kept as a string here; it is parsed by the todo use cases so that
/// an unparseable date is reported as a validation error rather than a decode error.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub due_date: String,
    #[serde(default)]
    pub done: bool,
}

/// Query parameters accepted by `GET /todos`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TodoQuery {
    /// Zero-based page index.
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive substring filter on the title.
    pub title: Option<String>,
}

impl TodoQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// Body of `GET /todos`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub data: Vec<Todo>,
    pub meta: PageMeta,
}

/// Body of `GET /todos/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// Body of `POST /todos`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: Uuid,
}
