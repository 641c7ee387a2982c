use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// The username of the caller, as verified by `AuthMiddleware`.
///
/// Only usable on routes inside a scope wrapped with `AuthMiddleware`; elsewhere
/// there are no claims to read and extraction fails with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUser(claims.sub.clone()))),
            None => {
                let err = AppError::Unauthorized("No authenticated user on this request".into());
                ready(Err(err.into()))
            }
        }
    }
}
