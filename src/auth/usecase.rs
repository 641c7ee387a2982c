//! Register and Login.
//!
//! bcrypt work runs on the blocking thread pool, never on an async worker.

use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenIssuer;
use crate::models::User;
use crate::store::{CredentialStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,
    /// Deliberately the same for an unknown username and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("failed to generate token")]
    TokenGenerationFailed,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(error: bcrypt::BcryptError) -> Self {
        AuthError::Hashing(error.to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(error: tokio::task::JoinError) -> Self {
        AuthError::Hashing(error.to_string())
    }
}

/// Successful login: who logged in and their bearer token.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub username: String,
    pub token: String,
}

pub struct RegisterUseCase {
    credentials: Arc<dyn CredentialStore>,
    cost: u32,
}

impl RegisterUseCase {
    pub fn new(credentials: Arc<dyn CredentialStore>, cost: u32) -> Self {
        Self { credentials, cost }
    }

    /// Creates a credential record for `username`. No token is issued.
    pub async fn execute(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.credentials.get_user_by_username(username).await {
            Ok(_) => return Err(AuthError::UserExists),
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let password = password.to_owned();
        let cost = self.cost;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;

        // A concurrent registration can still win between lookup and insert.
        self.credentials
            .create_user(&User::new(username, password_hash))
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => AuthError::UserExists,
                other => AuthError::Store(other),
            })?;

        log::info!("Registered user {}", username);
        Ok(())
    }
}

pub struct LoginUseCase {
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<TokenIssuer>,
}

impl LoginUseCase {
    pub fn new(credentials: Arc<dyn CredentialStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    pub async fn execute(&self, username: &str, password: &str) -> Result<LoginOutput, AuthError> {
        let user = match self.credentials.get_user_by_username(username).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                log::info!("Login rejected for {}", username);
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let password = password.to_owned();
        let stored_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await??;
        if !matches {
            log::info!("Login rejected for {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.generate(&user.username).map_err(|e| {
            log::error!("Token generation failed for {}: {}", user.username, e);
            AuthError::TokenGenerationFailed
        })?;

        log::info!("User {} logged in", user.username);
        Ok(LoginOutput {
            username: user.username,
            token,
        })
    }
}
