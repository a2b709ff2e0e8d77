use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use super::config::CliConfig;
use crate::auth::TOKEN_HEADER;
use crate::database::models::{Task, User};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not logged in, please log in first")]
    NotLoggedIn,

    /// The server answered with an error body
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("No token found in response headers")]
    MissingToken,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Config(String),
}

#[derive(Debug, Deserialize)]
struct Deleted<T> {
    deleted: T,
}

/// Thin typed wrapper over the HTTP API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &CliConfig) -> Self {
        Self {
            http: Client::new(),
            base: config.api_url.as_str().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// POST /auth. An identifier containing `@` is sent as the email.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, CliError> {
        let body = if identifier.contains('@') {
            json!({ "email": identifier, "password": password })
        } else {
            json!({ "username": identifier, "password": password })
        };

        let response = self.request(Method::POST, "/auth").json(&body).send().await?;
        let response = check(response).await?;
        token_header(&response)
    }

    /// POST /users; returns the new account and its session token
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(User, String), CliError> {
        let body = json!({ "username": username, "email": email, "password": password });
        let response = check(self.request(Method::POST, "/users").json(&body).send().await?).await?;
        let token = token_header(&response)?;
        Ok((response.json().await?, token))
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, CliError> {
        self.send(self.authed(Method::GET, "/tasks")?).await
    }

    pub async fn create_task(&self, body: &Value) -> Result<Task, CliError> {
        self.send(self.authed(Method::POST, "/tasks")?.json(body)).await
    }

    pub async fn update_task(&self, id: &str, body: &Value) -> Result<Task, CliError> {
        self.send(self.authed(Method::PATCH, &format!("/tasks/{}", id))?.json(body)).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<Task, CliError> {
        let body: Deleted<Task> = self.send(self.authed(Method::DELETE, &format!("/tasks/{}", id))?).await?;
        Ok(body.deleted)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base, endpoint))
    }

    fn authed(&self, method: Method, endpoint: &str) -> Result<RequestBuilder, CliError> {
        let token = self.token.as_deref().ok_or(CliError::NotLoggedIn)?;
        Ok(self.request(method, endpoint).header(TOKEN_HEADER, token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CliError> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Turn non-2xx responses into `CliError::Api` carrying the server's message
async fn check(response: Response) -> Result<Response, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: Option<Value> = response.json().await.ok();
    let message = body
        .as_ref()
        .and_then(|b| b.get("error").or_else(|| b.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("API Error ({})", status.as_u16()));

    Err(CliError::Api {
        status: status.as_u16(),
        message,
    })
}

fn token_header(response: &Response) -> Result<String, CliError> {
    response
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(CliError::MissingToken)
}
