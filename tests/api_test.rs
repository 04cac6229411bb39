//! Integration tests for API endpoints.
//!
//! The router runs on in-memory storage, so no database is required.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use account_registrar::api::{create_router, AppState};
use account_registrar::config::{Config, DEV_JWT_SECRET};

fn app() -> Router {
    create_router(AppState::in_memory(Config::new(DEV_JWT_SECRET).unwrap()))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn valid_body() -> Value {
    json!({
        "name": "Tall Stack",
        "email": "tallstack@example.com",
        "password": "secret",
        "passwordConfirmation": "secret"
    })
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register the valid body and return the issued bearer token
async fn register_token(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/register", valid_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = read_json(response).await;
    json["identity"]["access_token"].as_str().unwrap().to_string()
}

// =============================================================================
// Root and Health
// =============================================================================

#[tokio::test]
async fn test_root_endpoint() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_memory_storage() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["storage"]["kind"], "memory");
}

// =============================================================================
// Registration Form
// =============================================================================

#[tokio::test]
async fn test_registration_page_contains_component() {
    let response = app()
        .oneshot(Request::get("/register").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["component"], "auth.register");
    assert_eq!(json["fields"][1]["rules"], json!(["required", "email", "unique"]));
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_guest() {
    let response = app()
        .oneshot(
            Request::get("/register")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_is_redirected_if_already_logged_in() {
    let app = app();
    let token = register_token(&app).await;

    let response = app
        .oneshot(
            Request::get("/register")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/home");
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_a_user_can_register() {
    let response = app()
        .oneshot(post_json("/register", valid_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    assert_eq!(json["user"]["email"], "tallstack@example.com");
    assert_eq!(json["user"]["name"], "Tall Stack");
    assert!(json["user"].get("password_hash").is_none());
    assert_eq!(json["identity"]["user_id"], json["user"]["id"]);
    assert_eq!(json["identity"]["token_type"], "Bearer");
    assert_eq!(json["redirect_to"], "/home");
}

#[tokio::test]
async fn test_authenticated_post_redirects_without_registering() {
    let app = app();
    let token = register_token(&app).await;

    let mut body = valid_body();
    body["email"] = json!("another@example.com");
    let mut request = post_json("/register", body);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/home");

    // The redirected request created nothing
    let mut body = valid_body();
    body["email"] = json!("another@example.com");
    let response = app
        .oneshot(post_json("/register/validate?field=email", body))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["valid"], true);
}

#[tokio::test]
async fn test_authenticated_post_redirects_before_reading_body() {
    let app = app();
    let token = register_token(&app).await;

    for body in [Body::empty(), Body::from("not-json")] {
        let response = app
            .clone()
            .oneshot(
                Request::post("/register")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/home");
    }
}

#[tokio::test]
async fn test_guest_post_without_body_is_bad_request() {
    let response = app()
        .oneshot(Request::post("/register").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_email_hasnt_been_taken_already() {
    let app = app();
    register_token(&app).await;

    let response = app
        .oneshot(post_json("/register", valid_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = read_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["fields"], json!({"email": ["unique"]}));
}

#[tokio::test]
async fn test_every_failing_field_is_reported() {
    let response = app()
        .oneshot(post_json(
            "/register",
            json!({
                "name": "",
                "email": "calebporzio",
                "password": "secret",
                "passwordConfirmation": "not-secret"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = read_json(response).await;
    assert_eq!(
        json["error"]["fields"],
        json!({"name": ["required"], "email": ["email"], "password": ["same"]})
    );
}

#[tokio::test]
async fn test_password_is_minimum_of_six_characters() {
    let mut body = valid_body();
    body["password"] = json!("secre");
    body["passwordConfirmation"] = json!("secre");

    let response = app().oneshot(post_json("/register", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = read_json(response).await;
    assert_eq!(json["error"]["fields"], json!({"password": ["min"]}));
}

#[tokio::test]
async fn test_missing_fields_are_required() {
    let response = app()
        .oneshot(post_json("/register", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = read_json(response).await;
    assert_eq!(
        json["error"]["fields"],
        json!({"name": ["required"], "email": ["required"], "password": ["required"]})
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = app()
        .oneshot(
            Request::post("/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("not-json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"]["code"], "BAD_REQUEST");
}

// =============================================================================
// Live Validation
// =============================================================================

#[tokio::test]
async fn test_validate_single_field() {
    let response = app()
        .oneshot(post_json(
            "/register/validate?field=email",
            json!({"name": "", "email": "calebporzio"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"], json!({"email": ["email"]}));
}

#[tokio::test]
async fn test_validate_reports_taken_email() {
    let app = app();
    register_token(&app).await;

    let response = app
        .oneshot(post_json("/register/validate?field=email", valid_body()))
        .await
        .unwrap();

    let json = read_json(response).await;
    assert_eq!(json["errors"], json!({"email": ["unique"]}));
}

#[tokio::test]
async fn test_validate_whole_form() {
    let response = app()
        .oneshot(post_json("/register/validate", valid_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["valid"], true);
    assert_eq!(json["errors"], json!({}));
}

#[tokio::test]
async fn test_validate_unknown_field_is_bad_request() {
    let response = app()
        .oneshot(post_json("/register/validate?field=age", valid_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
