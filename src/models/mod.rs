pub mod todo;
pub mod user;

use serde::{Deserialize, Serialize};

pub use todo::{
    CreatedResponse, PageMeta, Todo, TodoInput, TodoListResponse, TodoQuery, TodoResponse,
};
pub use user::User;

/// Generic `{"message": ...}` acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
