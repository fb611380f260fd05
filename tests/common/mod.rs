//! Shared harness: the real router over a migrated in-memory SQLite database.
//!
//! Redis is left unconfigured, so caching and rate limiting are off.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use sea_orm::{ConnectOptions, Database as SeaDatabase};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use job_board::api::{create_router, AppState};
use job_board::config::Config;
use job_board::infra::Database;

pub const PASSWORD: &str = "correct-horse-battery";
const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// A logged-in caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // One connection, otherwise every pooled connection gets its own
        // empty in-memory database
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let connection = SeaDatabase::connect(options)
            .await
            .expect("connect to in-memory sqlite");

        let database = Database::from_connection(connection);
        database.run_migrations().await.expect("run migrations");

        let config = Config::new("sqlite::memory:", JWT_SECRET);
        let state = AppState::from_config(Arc::new(database), None, config);
        let router = create_router(state.clone());
        Self { router, state }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    async fn register(&self, email: &str, role: &str) -> Session {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({"email": email, "password": PASSWORD, "name": "Test User", "role": role}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let id = uuid_at(&body, "/data/id");
        let token = self.login(email).await;
        Session { id, token }
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({"email": email, "password": PASSWORD}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["accessToken"]
            .as_str()
            .expect("accessToken")
            .to_string()
    }

    pub async fn seeker(&self, email: &str) -> Session {
        self.register(email, "jobseeker").await
    }

    pub async fn employer(&self, email: &str) -> Session {
        self.register(email, "employer").await
    }

    /// Admins cannot self-register; create one through the service layer.
    pub async fn admin(&self, email: &str) -> Session {
        let user = self
            .state
            .services
            .auth()
            .create_admin(email.to_string(), PASSWORD.to_string(), "Admin".to_string())
            .await
            .expect("create admin");
        let token = self.login(email).await;
        Session { id: user.id, token }
    }

    /// Post an open listing and return its id.
    pub async fn post_job(&self, employer: &Session, title: &str) -> Uuid {
        self.post_job_with(employer, json!({ "title": title })).await
    }

    /// Post a listing; `overrides` replaces fields of a valid default body.
    pub async fn post_job_with(&self, employer: &Session, overrides: Value) -> Uuid {
        let mut body = json!({
            "title": "Backend Engineer",
            "description": "Build and run services",
            "location": "Berlin, DE",
            "jobType": "full-time",
            "deadline": in_days(30),
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        let (status, response) = self.post("/jobs", Some(&employer.token), body).await;
        assert_eq!(status, StatusCode::CREATED, "post job failed: {}", response);
        uuid_at(&response, "/data/id")
    }

    pub async fn apply(&self, seeker: &Session, job_id: Uuid) -> (StatusCode, Value) {
        self.post(
            "/applications",
            Some(&seeker.token),
            json!({
                "jobId": job_id,
                "resumeUrl": "https://cdn.example.com/cv.pdf",
                "coverLetter": "I would like this job",
            }),
        )
        .await
    }
}

/// `YYYY-MM-DD` for `days` from today (UTC).
pub fn in_days(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn uuid_at(body: &Value, pointer: &str) -> Uuid {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("no uuid at {} in {}", pointer, body))
}
