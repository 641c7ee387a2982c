use std::sync::Arc;

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest,
};

use crate::auth::{LoginUseCase, RegisterUseCase, TokenIssuer};
use crate::error::AppError;
use crate::store::Stores;
use crate::todos::TodoUseCase;

/// Everything the handlers and the auth middleware read from `app_data`.
///
/// Built once per process; `configure` hands cheap `Data` clones to each worker.
#[derive(Clone)]
pub struct AppState {
    pub tokens: web::Data<TokenIssuer>,
    pub register: web::Data<RegisterUseCase>,
    pub login: web::Data<LoginUseCase>,
    pub todos: web::Data<TodoUseCase>,
}

impl AppState {
    pub fn new(stores: Stores, tokens: TokenIssuer, bcrypt_cost: u32) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            register: web::Data::new(RegisterUseCase::new(
                stores.credentials.clone(),
                bcrypt_cost,
            )),
            login: web::Data::new(LoginUseCase::new(stores.credentials, tokens.clone())),
            todos: web::Data::new(TodoUseCase::new(stores.todos)),
            tokens: web::Data::from(tokens),
        }
    }

    /// Registers the shared state plus JSON/query/path extractor configs that report
    /// decode failures in the same `{"error": ...}` shape as every other error.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.tokens.clone())
            .app_data(self.register.clone())
            .app_data(self.login.clone())
            .app_data(self.todos.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .app_data(web::PathConfig::default().error_handler(path_error));
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// A path segment that is not a valid id can never name a record.
fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Unroutable path {}: {}", req.path(), err);
    AppError::NotFound("Todo not found".into()).into()
}
