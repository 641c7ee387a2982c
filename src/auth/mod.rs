pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;
pub mod usecase;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
pub use token::{Claims, TokenIssuer};
pub use usecase::{AuthError, LoginOutput, LoginUseCase, RegisterUseCase};

lazy_static! {
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Body of `POST /auth/register`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// 3 to 32 characters from `[A-Za-z0-9_-]`. Usernames are unique and case-sensitive.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, digits, '_' and '-'"
        )
    )]
    pub username: String,
    /// 6 to 72 characters; bcrypt ignores anything past 72 bytes.
    #[validate(length(min = 6, max = 72))]
    pub password: String,
}

/// Body of `POST /auth/login`.
///
/// Only presence is checked here; anything else about the credentials is
/// answered with the same "invalid credentials" error.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The JWT to send as `Authorization: Bearer <token>`.
    pub token: String,
}
