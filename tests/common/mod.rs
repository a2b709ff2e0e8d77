#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use todo_api_rust::config::AppConfig;
use todo_api_rust::database::MemoryStore;
use todo_api_rust::{app, AppState};

pub const PASSWORD: &str = "password123";

/// In-process application over a fresh in-memory store
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn token(&self) -> Option<String> {
        self.headers
            .get("x-auth-token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(AppConfig::test(), Arc::new(MemoryStore::new())).expect("test state");
        let router = app(state.clone());
        Self { state, router }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("x-auth-token", token);
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body)?).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };

        Ok(TestResponse { status, headers, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Register `username` (email `<username>@example.com`) and return its id and token
    pub async fn register(&self, username: &str) -> Result<(Uuid, String)> {
        let res = self
            .post(
                "/api/users",
                None,
                json!({ "username": username, "email": format!("{}@example.com", username), "password": PASSWORD }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::OK, "register failed: {} {}", res.status, res.body);

        let id = res.body["_id"].as_str().context("user id")?.parse()?;
        let token = res.token().context("register token")?;
        Ok((id, token))
    }

    /// Flag the user as administrator in the store and issue a token that says so
    pub async fn promote(&self, id: Uuid) -> Result<String> {
        let mut user = self.state.store.find_user(id).await?.context("user to promote")?;
        user.set_admin(true);
        self.state.store.update_user(&user).await?;
        Ok(self.state.tokens.issue(&user)?)
    }

    pub async fn create_task(&self, token: &str, name: &str) -> Result<Value> {
        let res = self.post("/api/tasks", Some(token), json!({ "name": name })).await?;
        anyhow::ensure!(res.status == StatusCode::OK, "create task failed: {} {}", res.status, res.body);
        Ok(res.body)
    }
}

/// Serve a fresh app on an unused local port; returns the `/api` base URL.
/// The server lives as long as the calling test's runtime.
pub async fn spawn_server() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test server")?;

    let state = AppState::new(AppConfig::test(), Arc::new(MemoryStore::new()))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    Ok(format!("http://127.0.0.1:{}/api", port))
}
