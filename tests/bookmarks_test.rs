//! Bookmark registry over HTTP.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn remove_is_idempotent_and_add_reactivates() {
    let app = TestApp::spawn().await;
    let employer = app.employer("corp@example.com").await;
    let seeker = app.seeker("saver@example.com").await;
    let job = app.post_job(&employer, "Worth saving").await;
    let uri = format!("/bookmarks/{}", job);
    let status_uri = format!("{}/status", uri);

    let (status, body) = app
        .request(Method::POST, &uri, Some(&seeker.token), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "saved");
    assert_eq!(body["data"]["job"]["title"], "Worth saving");

    let (_, body) = app.get(&status_uri, Some(&seeker.token)).await;
    assert_eq!(body["data"]["isBookmarked"], true);

    for _ in 0..2 {
        let (status, body) = app.delete(&uri, Some(&seeker.token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    let (_, body) = app.get(&status_uri, Some(&seeker.token)).await;
    assert_eq!(body["data"]["isBookmarked"], false);

    let (status, _) = app
        .post(&uri, Some(&seeker.token), json!({"notes": "second look"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/bookmarks", Some(&seeker.token)).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["notes"], "second look");
}

#[tokio::test]
async fn adding_twice_keeps_one_bookmark() {
    let app = TestApp::spawn().await;
    let employer = app.employer("corp@example.com").await;
    let seeker = app.seeker("saver@example.com").await;
    let job = app.post_job(&employer, "Saved twice").await;
    let uri = format!("/bookmarks/{}", job);

    let (_, first) = app
        .post(&uri, Some(&seeker.token), json!({"notes": "first"}))
        .await;
    let (status, second) = app
        .post(
            &uri,
            Some(&seeker.token),
            json!({"notes": "updated", "reminderDate": common::in_days(3)}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(second["data"]["notes"], "updated");
    assert_eq!(second["data"]["reminderDate"], common::in_days(3));

    let (_, body) = app.get("/bookmarks", Some(&seeker.token)).await;
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn update_changes_status_and_clears_notes() {
    let app = TestApp::spawn().await;
    let employer = app.employer("corp@example.com").await;
    let seeker = app.seeker("saver@example.com").await;
    let job = app.post_job(&employer, "Archive me").await;
    let uri = format!("/bookmarks/{}", job);

    let (status, _) = app
        .put(&uri, Some(&seeker.token), json!({"status": "archived"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post(&uri, Some(&seeker.token), json!({"notes": "maybe"}))
        .await;
    let (status, body) = app
        .put(
            &uri,
            Some(&seeker.token),
            json!({"status": "archived", "notes": "  "}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "archived");
    assert!(body["data"]["notes"].is_null() || body["data"]["notes"] == "");

    let (_, body) = app
        .get("/bookmarks?status=archived", Some(&seeker.token))
        .await;
    assert_eq!(body["data"]["total"], 1);
    let (_, body) = app.get("/bookmarks?status=saved", Some(&seeker.token)).await;
    assert_eq!(body["data"]["total"], 0);

    // Re-adding an archived bookmark brings it back to saved
    let (_, body) = app
        .request(Method::POST, &uri, Some(&seeker.token), None)
        .await;
    assert_eq!(body["data"]["status"], "saved");
}

#[tokio::test]
async fn applying_marks_the_bookmark_applied() {
    let app = TestApp::spawn().await;
    let employer = app.employer("corp@example.com").await;
    let seeker = app.seeker("saver@example.com").await;
    let job = app.post_job(&employer, "Saved then applied").await;

    app.request(
        Method::POST,
        &format!("/bookmarks/{}", job),
        Some(&seeker.token),
        None,
    )
    .await;
    let (status, _) = app.apply(&seeker, job).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/bookmarks?status=applied", Some(&seeker.token)).await;
    assert_eq!(body["data"]["total"], 1);

    let (_, body) = app
        .get(&format!("/jobs/{}", job), Some(&seeker.token))
        .await;
    assert_eq!(body["data"]["isBookmarked"], true);
}

#[tokio::test]
async fn bookmarks_are_for_seekers_only() {
    let app = TestApp::spawn().await;
    let employer = app.employer("corp@example.com").await;
    let job = app.post_job(&employer, "Not for employers").await;

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/bookmarks/{}", job),
            Some(&employer.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/bookmarks", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bookmarking_a_missing_listing_is_not_found() {
    let app = TestApp::spawn().await;
    let seeker = app.seeker("saver@example.com").await;
    let (status, _) = app
        .request(
            Method::POST,
            &format!("/bookmarks/{}", uuid::Uuid::new_v4()),
            Some(&seeker.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
