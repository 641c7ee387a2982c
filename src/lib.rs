#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "Credential and todo stores, the JWT auth layer, the todo use cases and the"]
#![doc = "HTTP routes. `main.rs` wires them into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod todos;

pub use crate::error::AppError;
pub use crate::state::AppState;
