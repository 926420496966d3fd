//! End-to-end workflows that cross resource boundaries: the seeded-admin
//! happy path and the admin alert fan-out driven by the notifier.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_and_login, delete_auth, get_auth, post_json, post_json_auth, put_json_auth,
};
use sqlx::PgPool;
use tasklane_api::seed::seed_default_users;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a project via the API and return its id.
async fn create_project(pool: &PgPool, token: &str, name: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/projects",
        serde_json::json!({ "name": name }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a task via the API and return the response JSON.
async fn create_task(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/tasks", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Poll `GET /history?taskId=` until an entry with the given action shows
/// up. The recorder runs on a separate task, so rows appear shortly after
/// the mutation response.
async fn wait_for_history(
    pool: &PgPool,
    token: &str,
    task_id: i64,
    action: &str,
) -> serde_json::Value {
    for _ in 0..100 {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, &format!("/history?taskId={task_id}"), token).await;
        let entries = body_json(response).await;
        if let Some(entry) = entries
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["action"] == action)
        {
            return entry.clone();
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("no {action} history entry appeared for task {task_id}");
}

/// Poll `GET /notifications` until at least `expected` admin alerts are
/// visible to the given user, then return them (newest first).
async fn wait_for_alerts(pool: &PgPool, token: &str, expected: usize) -> Vec<serde_json::Value> {
    for _ in 0..100 {
        let app = common::build_test_app(pool.clone());
        let list = body_json(get_auth(app, "/notifications", token).await).await;
        let alerts: Vec<serde_json::Value> = list
            .as_array()
            .unwrap()
            .iter()
            .filter(|n| n["type"] == "admin_alert")
            .cloned()
            .collect();
        if alerts.len() >= expected {
            return alerts;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("expected {expected} admin alerts, they never arrived");
}

/// Log in through the API with an explicit password (the common helper
/// assumes the fixture password).
async fn login_with(pool: &PgPool, username: &str, password: &str) -> String {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/auth/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn seeding_fills_an_empty_database_once(pool: PgPool) {
    seed_default_users(&pool).await.unwrap();

    let app = common::build_test_app(pool.clone());
    let admin_token = login_with(&pool, "admin", "admin123").await;
    let users = body_json(get_auth(app, "/users", &admin_token).await).await;
    let users = users.as_array().unwrap().clone();
    assert_eq!(users.len(), 3);
    assert_eq!(users[0]["username"], "admin");
    assert_eq!(users[0]["role"], "admin");
    assert_eq!(users[1]["username"], "user1");
    assert_eq!(users[1]["role"], "user");
    assert_eq!(users[2]["username"], "user2");
    assert_eq!(users[2]["role"], "user");

    // A populated table is left alone.
    seed_default_users(&pool).await.unwrap();
    let app = common::build_test_app(pool.clone());
    let users = body_json(get_auth(app, "/users", &admin_token).await).await;
    assert_eq!(users.as_array().unwrap().len(), 3);

    // The seeded regular accounts work too.
    login_with(&pool, "user1", "user123").await;
}

// ---------------------------------------------------------------------------
// Admin happy path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn seeded_admin_workflow_records_history_without_alerts(pool: PgPool) {
    seed_default_users(&pool).await.unwrap();
    let token = login_with(&pool, "admin", "admin123").await;

    let project_id = create_project(&pool, &token, "Demo").await;
    let task = create_task(
        &pool,
        &token,
        serde_json::json!({ "title": "T1", "projectId": project_id }),
    )
    .await;
    let task_id = task["id"].as_i64().unwrap();
    assert_eq!(task["status"], "Pending");
    assert_eq!(task["priority"], "Medium");

    let app = common::build_test_app(pool.clone());
    let listed = body_json(get_auth(app, "/tasks", &token).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], task_id);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/tasks/{task_id}"),
        serde_json::json!({ "status": "Completed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "Completed");

    let entry = wait_for_history(&pool, &token, task_id, "STATUS_CHANGED").await;
    assert_eq!(entry["oldValue"], "Pending");
    assert_eq!(entry["newValue"], "Completed");

    // Full trail, newest first.
    let app = common::build_test_app(pool.clone());
    let trail = body_json(get_auth(app, &format!("/history?taskId={task_id}"), &token).await).await;
    let trail = trail.as_array().unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0]["action"], "STATUS_CHANGED");
    assert_eq!(trail[1]["action"], "CREATED");

    // An admin actor alerts no one, and the task was never assigned.
    let app = common::build_test_app(pool.clone());
    let notifications = body_json(get_auth(app, "/notifications", &token).await).await;
    assert_eq!(notifications.as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Admin alert fan-out
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_task_changes_alert_every_admin(pool: PgPool) {
    let (_root, root_token) = create_and_login(&pool, "root", "admin").await;
    let (_ops, ops_token) = create_and_login(&pool, "ops", "admin").await;
    let (_alice, alice_token) = create_and_login(&pool, "alice", "user").await;

    let project_id = create_project(&pool, &alice_token, "Skunkworks").await;
    let task = create_task(
        &pool,
        &alice_token,
        serde_json::json!({ "title": "Ship it", "projectId": project_id }),
    )
    .await;
    let task_id = task["id"].as_i64().unwrap();

    let alerts = wait_for_alerts(&pool, &root_token, 1).await;
    assert_eq!(alerts[0]["message"], "User alice created task \"Ship it\"");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/tasks/{task_id}"),
        serde_json::json!({ "title": "Ship it v2" }),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/tasks/{task_id}"), &alice_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Both admins hear about all three changes, newest first.
    for token in [&root_token, &ops_token] {
        let alerts = wait_for_alerts(&pool, token, 3).await;
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0]["message"], "User alice deleted task \"Ship it v2\"");
        assert_eq!(alerts[1]["message"], "User alice updated task \"Ship it v2\"");
        assert_eq!(alerts[2]["message"], "User alice created task \"Ship it\"");
    }

    // The actor themselves is not alerted.
    let app = common::build_test_app(pool.clone());
    let own = body_json(get_auth(app, "/notifications", &alice_token).await).await;
    assert!(own
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["type"] != "admin_alert"));
}
