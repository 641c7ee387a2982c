use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use todo_api::auth::{LoginResponse, TokenIssuer, MIN_BCRYPT_COST};
use todo_api::routes::{self, health};
use todo_api::store::Stores;
use todo_api::AppState;

const SECRET: &[u8] = b"integration-test-secret";

macro_rules! test_app {
    () => {{
        let state = AppState::new(Stores::in_memory(), TokenIssuer::new(SECRET), MIN_BCRYPT_COST);
        test::init_service(
            App::new()
                .configure(|cfg| state.configure(cfg))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                        .max_age(3600),
                )
                .wrap(Logger::default())
                .service(health::health)
                .configure(routes::config),
        )
        .await
    }};
}

fn credentials(username: &str, password: &str) -> Value {
    json!({ "username": username, "password": password })
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(credentials("alice", "secret1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User registered successfully");
    assert!(body.get("token").is_none(), "register must not issue a token");

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(credentials("alice", "secret1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: LoginResponse = test::read_body_json(resp).await;

    let claims = TokenIssuer::new(SECRET)
        .verify(&login.token)
        .expect("issued token should verify");
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
}

#[actix_rt::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app!();

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(credentials("bob", "hunter22"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }

    // The first password still works; the second attempt changed nothing.
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(credentials("bob", "hunter22"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(credentials("carol", "correct-horse"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let wrong_password = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(credentials("carol", "battery-staple"))
        .to_request();
    let wrong_password = test::call_service(&app, wrong_password).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(wrong_password).await;

    let unknown_user = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(credentials("mallory", "battery-staple"))
        .to_request();
    let unknown_user = test::call_service(&app, unknown_user).await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = test::read_body_json(unknown_user).await;

    assert_eq!(wrong_password, unknown_user);
}

#[actix_rt::test]
async fn test_register_rejects_invalid_input() {
    let app = test_app!();

    let cases = [
        credentials("ab", "secret1"),
        credentials("no spaces", "secret1"),
        credentials("dave", "short"),
        json!({ "username": "dave" }),
    ];
    for payload in cases {
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    // Nothing was stored by the rejected attempts.
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(credentials("dave", "secret1"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}
