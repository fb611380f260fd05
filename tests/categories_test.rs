//! Category catalog over HTTP and through the service layer.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use common::{in_days, TestApp};
use job_board::errors::AppError;

#[tokio::test]
async fn admin_manages_the_catalog() {
    let app = TestApp::spawn().await;
    let admin = app.admin("admin@example.com").await;

    let (status, body) = app
        .post("/categories", Some(&admin.token), json!({"name": "  Data  "}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Data");
    let id = common::uuid_at(&body, "/data/id");

    let (status, _) = app
        .post("/categories", Some(&admin.token), json!({"name": "Data"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .put(
            &format!("/categories/{}", id),
            Some(&admin.token),
            json!({"name": "Data Science"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Data Science");

    let (_, body) = app.get("/categories", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .delete(&format!("/categories/{}", id), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/categories", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // The name is free again once the old row is soft-deleted
    let (status, _) = app
        .post("/categories", Some(&admin.token), json!({"name": "Data Science"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn non_admins_cannot_edit_the_catalog() {
    let app = TestApp::spawn().await;
    let employer = app.employer("corp@example.com").await;

    let (status, _) = app
        .post("/categories", Some(&employer.token), json!({"name": "Sales"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/categories", None, json!({"name": "Sales"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn listings_cannot_move_into_a_deleted_category() {
    let app = TestApp::spawn().await;
    let admin = app.admin("admin@example.com").await;
    let employer = app.employer("corp@example.com").await;

    let (_, body) = app
        .post("/categories", Some(&admin.token), json!({"name": "Retail"}))
        .await;
    let retail = common::uuid_at(&body, "/data/id");
    let job = app
        .post_job_with(&employer, json!({"categoryId": retail, "deadline": in_days(5)}))
        .await;

    let (_, body) = app.get(&format!("/jobs?category={}", retail), None).await;
    assert_eq!(body["data"]["total"], 1);

    app.delete(&format!("/categories/{}", retail), Some(&admin.token))
        .await;

    // Existing listings keep the reference
    let (_, body) = app.get(&format!("/jobs/{}", job), None).await;
    assert_eq!(body["data"]["categoryId"], retail.to_string());

    let (status, _) = app
        .put(
            &format!("/jobs/{}", job),
            Some(&employer.token),
            json!({"categoryId": retail}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seeding_is_repeatable() {
    let app = TestApp::spawn().await;
    let categories = app.state.services.categories();

    let added = assert_ok!(categories.seed_defaults().await);
    assert!(added > 0);
    let again = assert_ok!(categories.seed_defaults().await);
    assert_eq!(again, 0);

    let listed = assert_ok!(categories.list().await);
    assert_eq!(listed.len(), added);
}

#[tokio::test]
async fn renaming_a_missing_category_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.admin("admin@example.com").await;
    let identity = job_board::Identity::new(admin.id, job_board::UserRole::Admin);

    let result = app
        .state
        .services
        .categories()
        .rename(&identity, uuid::Uuid::new_v4(), "Ghost".to_string())
        .await;
    let err = assert_err!(result);
    assert!(matches!(err, AppError::NotFound));
}
