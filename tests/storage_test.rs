//! Uniqueness held by the partial indexes themselves, without the
//! services' lookups in front of them.

mod common;

use tokio_test::{assert_err, assert_ok};

use common::TestApp;
use job_board::domain::NewApplication;
use job_board::errors::AppError;
use job_board::infra::repositories::{
    ApplicationRepository, ApplicationStore, BookmarkRepository, BookmarkStore,
};

#[tokio::test]
async fn second_live_application_is_refused_by_storage() {
    let app = TestApp::spawn().await;
    let employer = app.employer("hiring@example.com").await;
    let seeker = app.seeker("twice@example.com").await;
    let job = app.post_job(&employer, "Indexed role").await;
    let store = ApplicationStore::new(app.state.database.get_connection());

    let submission = || {
        NewApplication::new(
            seeker.id,
            job,
            "https://cv.example.com/me.pdf",
            "Hello",
            None,
        )
        .unwrap()
    };

    let first = assert_ok!(store.create(submission()).await);
    let err = assert_err!(store.create(submission()).await);
    assert!(matches!(err, AppError::Conflict(_)), "{:?}", err);

    // A withdrawn application frees the pair
    assert!(assert_ok!(store.soft_delete(first.id, seeker.id).await));
    let again = assert_ok!(store.create(submission()).await);
    assert_ne!(again.id, first.id);
}

#[tokio::test]
async fn second_live_bookmark_is_refused_by_storage() {
    let app = TestApp::spawn().await;
    let employer = app.employer("hiring@example.com").await;
    let seeker = app.seeker("saver@example.com").await;
    let job = app.post_job(&employer, "Indexed bookmark").await;
    let store = BookmarkStore::new(app.state.database.get_connection());

    let first = assert_ok!(store.create(seeker.id, job, None, None).await);
    let err = assert_err!(store.create(seeker.id, job, Some("dup".into()), None).await);
    assert!(matches!(err, AppError::Conflict(_)), "{:?}", err);

    assert_eq!(assert_ok!(store.soft_delete_pair(seeker.id, job).await), 1);
    let again = assert_ok!(store.create(seeker.id, job, None, None).await);
    assert_ne!(again.id, first.id);
}
