//! Bearer-token gate.
//!
//! Routes declare that they need authentication by being registered inside a
//! scope wrapped with [`AuthMiddleware`]. Everything outside such a scope runs
//! unauthenticated. For wrapped routes the middleware either forwards the request
//! with the verified [`Claims`](crate::auth::Claims) attached to its extensions,
//! or answers 401 itself without calling the handler.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{Claims, TokenIssuer};
use crate::error::AppError;

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

/// Pulls the token out of `Authorization`. A missing `Bearer ` prefix leaves the
/// raw header value, which then fails verification.
fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let tokens = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| AppError::InternalServerError("TokenIssuer is not registered".into()))?;
    let token = bearer_token(req).ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;
    Ok(tokens.verify(token)?)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                log::debug!("Rejected {} {}: {}", req.method(), req.path(), app_err);
                let response = req.into_response(app_err.error_response());
                Box::pin(async move { Ok(response.map_into_right_body()) })
            }
        }
    }
}
