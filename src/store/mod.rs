//! # Persistence
//!
//! Storage contracts for the two entity types the API keeps: user credentials and
//! todo items. Use cases only ever see `Arc<dyn CredentialStore>` and
//! `Arc<dyn TodoStore>`, so a backend can be swapped without touching them.
//!
//! Two backends are provided: [`memory`], a process-local map behind a
//! reader/writer lock, and [`postgres`], backed by `sqlx`.

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::config::StoreBackend;
use crate::models::{Todo, User};

pub use memory::{MemoryCredentialStore, MemoryTodoStore};
pub use postgres::{PgCredentialStore, PgTodoStore};

/// Errors surfaced by any store backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    AlreadyExists,
    #[error("store call exceeded its deadline")]
    Timeout,
    #[error("store backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                StoreError::AlreadyExists
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// One page of a listing plus the number of records matching the filter overall.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn empty(total: i64) -> Self {
        Self {
            items: Vec::new(),
            total,
        }
    }
}

/// Username-keyed credential records. Credentials are immutable once created.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fails with [`StoreError::AlreadyExists`] if the username is taken.
    async fn create_user(&self, user: &User) -> StoreResult<()>;

    /// Fails with [`StoreError::NotFound`] if no such user exists.
    async fn get_user_by_username(&self, username: &str) -> StoreResult<User>;
}

/// Id-keyed todo records.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Upserts by id.
    async fn save(&self, todo: &Todo) -> StoreResult<()>;

    /// Returns page `page` (zero-based) of `limit` records whose title contains
    /// `title` case-insensitively, most recently created first. An empty `title`
    /// matches everything. `page < 0` or `limit <= 0` yields an empty page; the
    /// total is always the full filtered count.
    async fn find_all(&self, page: i64, limit: i64, title: &str) -> StoreResult<Page<Todo>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Todo>;

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()>;

    /// Replaces title, due date and done flag. Fails with [`StoreError::NotFound`]
    /// when no record has the id; a record is never created here.
    async fn update_by_id(&self, todo: &Todo) -> StoreResult<()>;
}

/// The pair of stores a running server uses.
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub todos: Arc<dyn TodoStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            credentials: Arc::new(MemoryCredentialStore::new()),
            todos: Arc::new(MemoryTodoStore::new()),
        }
    }
}

/// Builds the stores for the configured backend. For PostgreSQL this connects,
/// and creates the schema if it is missing.
pub async fn connect(backend: &StoreBackend, timeout: Duration) -> StoreResult<Stores> {
    match backend {
        StoreBackend::Memory => {
            log::info!("Using in-memory stores");
            Ok(Stores::in_memory())
        }
        StoreBackend::Postgres { database_url } => {
            log::info!("Connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(timeout)
                .connect(database_url)
                .await?;
            postgres::ensure_schema(&pool, timeout).await?;
            log::info!("PostgreSQL schema ready");
            Ok(Stores {
                credentials: Arc::new(PgCredentialStore::new(pool.clone(), timeout)),
                todos: Arc::new(PgTodoStore::new(pool, timeout)),
            })
        }
    }
}
