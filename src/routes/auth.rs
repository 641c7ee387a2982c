use crate::{
    auth::{LoginRequest, LoginResponse, LoginUseCase, RegisterRequest, RegisterUseCase},
    error::AppError,
    models::MessageResponse,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a credential record. No token is issued; clients log in afterwards.
///
/// ## Responses:
/// - `201 Created`: `{"message": ...}`.
/// - `400 Bad Request`: malformed body or invalid username/password shape.
/// - `409 Conflict`: the username is taken.
#[post("/register")]
pub async fn register(
    register_uc: web::Data<RegisterUseCase>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    register_uc
        .execute(&register_data.username, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse::new("User registered successfully")))
}

/// Login user
///
/// Checks the credentials and returns a bearer token valid for 24 hours.
///
/// ## Responses:
/// - `200 OK`: `{"token": ...}`.
/// - `400 Bad Request`: malformed body.
/// - `401 Unauthorized`: unknown username or wrong password (indistinguishable).
#[post("/login")]
pub async fn login(
    login_uc: web::Data<LoginUseCase>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let output = login_uc
        .execute(&login_data.username, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: output.token,
    }))
}
