//! Common test utilities for integration tests
//!
//! Every test gets its own router over a fresh `MemoryStore`, so tests run in
//! parallel without a database. Users are inserted straight into the store and
//! handed a token, skipping the (deliberately slow) password hashing except in
//! the tests that exercise sign-up and sign-in.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use plando_api::app::{build_router, AppState};
use plando_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use plando_shared::auth::jwt::TokenService;
use plando_shared::models::user::CreateUser;
use plando_shared::store::{memory::MemoryStore, UserStore};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret-at-least-32-bytes";

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
            request_timeout_seconds: 5,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
            ttl_hours: 1,
        },
    }
}

/// A user that exists in the store, with a valid token
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

/// Test context containing the router and its backing store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub tokens: TokenService,
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config());
        let tokens = state.tokens.clone();

        Self {
            store,
            tokens,
            app: build_router(state),
        }
    }

    /// Inserts a user directly and issues a token for them
    pub async fn user(&self, name: &str) -> TestUser {
        let user = self
            .store
            .insert_user(CreateUser {
                name: name.to_string(),
                password_hash: "not-a-real-hash".to_string(),
            })
            .await
            .expect("insert test user");

        TestUser {
            id: user.id,
            token: self.tokens.issue(&user).expect("issue test token"),
        }
    }

    /// Sends a request and returns the status with the decoded JSON body
    ///
    /// Non-JSON bodies come back as `Value::Null`.
    pub async fn send(
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

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Creates a category through the API and returns its id
    pub async fn category(&self, user: &TestUser, name: &str) -> Uuid {
        let (status, body) = self
            .post("/api/v1/category", &user.token, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK, "create category: {}", body);
        id_of(&body)
    }

    /// Creates a task through the API and returns its id
    pub async fn task(&self, user: &TestUser, title: &str, category_ids: &[Uuid]) -> Uuid {
        let (status, body) = self
            .post(
                "/api/v1/task",
                &user.token,
                serde_json::json!({
                    "title": title,
                    "description": "",
                    "category_ids": category_ids,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create task: {}", body);
        id_of(&body)
    }
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(|| panic!("response has no id: {}", body))
}

/// Asserts the uniform error body and returns its message
pub fn error_message(body: &Value) -> &str {
    assert_eq!(body["status"], "Error", "not an error body: {}", body);
    body["message"].as_str().expect("error message")
}
