//! Registration, login, profile and user administration over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, PASSWORD};

#[tokio::test]
async fn register_then_fetch_own_profile() {
    let app = TestApp::spawn().await;
    let seeker = app.seeker("Ada@Example.com").await;

    let (status, body) = app.get("/users/me", Some(&seeker.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["role"], "jobseeker");
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn role_defaults_to_jobseeker() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({"email": "nobody@example.com", "password": PASSWORD, "name": "No Role"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "jobseeker");
}

#[tokio::test]
async fn admin_cannot_self_register() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({"email": "root@example.com", "password": PASSWORD, "name": "Root", "role": "admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn duplicate_email_conflicts_case_insensitively() {
    let app = TestApp::spawn().await;
    app.employer("hr@example.com").await;

    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({"email": "HR@example.com", "password": PASSWORD, "name": "Again", "role": "employer"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({"email": "short@example.com", "password": "abc", "name": "Short"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    app.seeker("grace@example.com").await;

    let (status, body) = app
        .post(
            "/auth/login",
            None,
            json!({"email": "grace@example.com", "password": "not-the-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn invalid_token_is_rejected_even_on_public_routes() {
    let app = TestApp::spawn().await;
    let (status, _) = app.get("/jobs", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/jobs", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn protected_route_requires_a_token() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get("/users/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn admin_lists_and_deletes_users() {
    let app = TestApp::spawn().await;
    let admin = app.admin("admin@example.com").await;
    let seeker = app.seeker("leaving@example.com").await;

    let (status, body) = app.get("/users?page=1&size=10", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);

    let (status, _) = app
        .delete(&format!("/users/{}", seeker.id), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);

    // A deleted account's token stops working immediately
    let (status, _) = app.get("/users/me", Some(&seeker.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // And its email stays reserved
    let (status, _) = app
        .post(
            "/auth/register",
            None,
            json!({"email": "leaving@example.com", "password": PASSWORD, "name": "Back"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_cannot_delete_self_and_others_cannot_list() {
    let app = TestApp::spawn().await;
    let admin = app.admin("boss@example.com").await;
    let employer = app.employer("corp@example.com").await;

    let (status, _) = app
        .delete(&format!("/users/{}", admin.id), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/users", Some(&employer.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_path_id_uses_error_envelope() {
    let app = TestApp::spawn().await;
    let admin = app.admin("paths@example.com").await;
    let (status, body) = app.delete("/users/not-a-uuid", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn health_reports_cache_disabled() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["cache"]["status"], "disabled");
}
