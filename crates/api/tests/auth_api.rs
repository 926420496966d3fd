//! HTTP-level integration tests for login and token handling.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, get_auth, post_json};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns the public user info and a token, and never
/// the password hash.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_success_returns_user_and_token(pool: PgPool) {
    let user = create_test_user(&pool, "loginuser", "user").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "loginuser", "password": common::TEST_PASSWORD });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["role"], "user");
    assert!(json["token"].is_string(), "response must contain a token");

    // No hash material anywhere in the payload.
    let raw = json.to_string();
    assert!(!raw.contains("password"), "response must not echo password fields");
    assert!(!raw.contains("argon2"), "response must not leak the hash");
}

/// Missing or empty credentials yield 400 with the fixed message.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_missing_fields_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/auth/login", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Username and password are required");
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // Empty strings count as missing.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "  ", "password": "" });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Wrong password and unknown username are indistinguishable: same status,
/// same message.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_failure_does_not_reveal_which_field_was_wrong(pool: PgPool) {
    create_test_user(&pool, "realuser", "user").await;

    let app = common::build_test_app(pool.clone());
    let wrong_pw = post_json(
        app,
        "/auth/login",
        serde_json::json!({ "username": "realuser", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    let wrong_pw_json = body_json(wrong_pw).await;

    let app = common::build_test_app(pool);
    let no_user = post_json(
        app,
        "/auth/login",
        serde_json::json!({ "username": "ghost", "password": "whatever1" }),
    )
    .await;
    assert_eq!(no_user.status(), StatusCode::UNAUTHORIZED);
    let no_user_json = body_json(no_user).await;

    assert_eq!(wrong_pw_json["error"], "Invalid username or password");
    assert_eq!(wrong_pw_json["error"], no_user_json["error"]);
}

/// Malformed JSON body is a 400, not a 500.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_malformed_json_returns_400(pool: PgPool) {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Token usage on protected endpoints
// ---------------------------------------------------------------------------

/// A fresh login token opens protected endpoints.
#[sqlx::test(migrations = "../db/migrations")]
async fn token_grants_access_to_protected_endpoint(pool: PgPool) {
    let (_user, token) = common::create_and_login(&pool, "tokenuser", "user").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/tasks", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// No Authorization header at all.
#[sqlx::test(migrations = "../db/migrations")]
async fn missing_authorization_header_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/tasks").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing Authorization header");
    assert_eq!(json["code"], "UNAUTHORIZED");
}

/// Authorization header without the Bearer scheme.
#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_authorization_scheme_returns_401(pool: PgPool) {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/tasks")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Invalid Authorization format. Expected: Bearer <token>"
    );
}

/// Garbage and tampered tokens both fail closed.
#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_token_returns_401(pool: PgPool) {
    let (_user, token) = common::create_and_login(&pool, "tampered", "user").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/tasks", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Flip a character in the signature.
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'a' { 'b' } else { 'a' });

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/tasks", &tampered).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}
