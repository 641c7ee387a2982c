//! In-memory store backends.
//!
//! Each store owns its map behind a `tokio::sync::RwLock`: listings and point reads
//! share the lock, writes take it exclusively. Records are cloned in and out so
//! callers never alias the stored copy.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, Page, StoreError, StoreResult, TodoStore};
use crate::models::{Todo, User};

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::AlreadyExists);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[derive(Debug)]
struct Entry {
    todo: Todo,
    // Insertion sequence; stands in for a creation timestamp when ordering.
    seq: u64,
}

#[derive(Debug, Default)]
struct TodoTable {
    entries: HashMap<Uuid, Entry>,
    next_seq: u64,
}

#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    table: RwLock<TodoTable>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn title_matches(title: &str, needle: &str) -> bool {
    needle.is_empty() || title.to_lowercase().contains(needle)
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn save(&self, todo: &Todo) -> StoreResult<()> {
        let mut table = self.table.write().await;
        if let Some(entry) = table.entries.get_mut(&todo.id) {
            entry.todo = todo.clone();
            return Ok(());
        }
        let seq = table.next_seq;
        table.next_seq += 1;
        table.entries.insert(
            todo.id,
            Entry {
                todo: todo.clone(),
                seq,
            },
        );
        Ok(())
    }

    async fn find_all(&self, page: i64, limit: i64, title: &str) -> StoreResult<Page<Todo>> {
        let needle = title.to_lowercase();
        let table = self.table.read().await;

        let mut matching: Vec<&Entry> = table
            .entries
            .values()
            .filter(|entry| title_matches(&entry.todo.title, &needle))
            .collect();
        let total = matching.len() as i64;

        if page < 0 || limit <= 0 {
            return Ok(Page::empty(total));
        }
        let start = match page.checked_mul(limit) {
            Some(start) if start < total => start as usize,
            _ => return Ok(Page::empty(total)),
        };

        matching.sort_unstable_by(|a, b| b.seq.cmp(&a.seq));
        let items = matching
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .map(|entry| entry.todo.clone())
            .collect();

        Ok(Page { items, total })
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Todo> {
        self.table
            .read()
            .await
            .entries
            .get(&id)
            .map(|entry| entry.todo.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        self.table
            .write()
            .await
            .entries
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, todo: &Todo) -> StoreResult<()> {
        let mut table = self.table.write().await;
        let entry = table.entries.get_mut(&todo.id).ok_or(StoreError::NotFound)?;
        entry.todo.title = todo.title.clone();
        entry.todo.due_date = todo.due_date;
        entry.todo.done = todo.done;
        Ok(())
    }
}
