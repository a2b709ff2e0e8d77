//! Per-route request pipeline.
//!
//! Every protected route turns its request into a [`RequestContext`] and runs an
//! ordered [`Pipeline`] of [`Stage`]s over it. A stage either lets the request
//! through (possibly enriching the context) or rejects it with the reason as an
//! [`ApiError`]; the first rejection ends the run. Handlers only execute once
//! every stage has passed.

pub mod auth;
pub mod authorize;
pub mod identifier;
pub mod loader;
pub mod response;
pub mod validate;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{IdentityClaim, TOKEN_HEADER};
use crate::database::models::{Task, User};
use crate::error::ApiError;

pub use auth::TokenVerifier;
pub use authorize::{Authorizer, Policy};
pub use identifier::IdentifierValidator;
pub use loader::{EntityKind, ResourceLoader};
pub use response::ApiResponse;
pub use validate::BodyValidator;

/// State of the `x-auth-token` header on the incoming request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenHeader {
    #[default]
    Missing,
    /// Present but not visible ASCII
    Unreadable,
    Value(String),
}

impl TokenHeader {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(TOKEN_HEADER) {
            None => TokenHeader::Missing,
            Some(value) => match value.to_str() {
                Ok(token) => TokenHeader::Value(token.to_string()),
                Err(_) => TokenHeader::Unreadable,
            },
        }
    }
}

/// Entity fetched by a [`ResourceLoader`]
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedResource {
    User(User),
    Task(Task),
}

/// Per-request state shared by the stages of one pipeline run.
///
/// `identity`, `resource`, `id` and `payload` are only populated by the stage
/// that owns them; anything downstream must treat them as optional.
#[derive(Debug, Default)]
pub struct RequestContext {
    pub token: TokenHeader,
    pub raw_id: Option<String>,
    pub body: Bytes,

    pub id: Option<Uuid>,
    pub identity: Option<IdentityClaim>,
    pub resource: Option<LoadedResource>,
    pub payload: Option<Map<String, Value>>,
}

impl RequestContext {
    pub fn new(headers: &HeaderMap) -> Self {
        Self {
            token: TokenHeader::from_headers(headers),
            ..Default::default()
        }
    }

    pub fn with_path_id(mut self, id: impl Into<String>) -> Self {
        self.raw_id = Some(id.into());
        self
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn identity(&self) -> Result<&IdentityClaim, ApiError> {
        self.identity
            .as_ref()
            .ok_or_else(|| ApiError::unauthenticated("Unauthorized"))
    }

    pub fn take_user(&mut self) -> Result<User, ApiError> {
        match self.resource.take() {
            Some(LoadedResource::User(user)) => Ok(user),
            _ => Err(ApiError::not_found("User not found")),
        }
    }

    pub fn take_task(&mut self) -> Result<Task, ApiError> {
        match self.resource.take() {
            Some(LoadedResource::Task(task)) => Ok(task),
            _ => Err(ApiError::not_found("Task not found")),
        }
    }

    /// Deserialize the validated payload into its typed form
    pub fn payload_as<T: DeserializeOwned>(&mut self) -> Result<T, ApiError> {
        let payload = self
            .payload
            .take()
            .ok_or_else(|| ApiError::internal("payload requested before body validation"))?;

        serde_json::from_value(Value::Object(payload))
            .map_err(|e| ApiError::internal(format!("validated payload did not deserialize: {}", e)))
    }
}

/// One check in a route's pipeline
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage name for logging and debugging
    fn name(&self) -> &'static str;

    /// Allow (`Ok`) or deny with the reason (`Err`)
    async fn check(&self, ctx: &mut RequestContext) -> Result<(), ApiError>;
}

/// Ordered list of stages, built once at startup and shared by requests
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub async fn run(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        for stage in &self.stages {
            if let Err(err) = stage.check(ctx).await {
                tracing::debug!("Stage '{}' rejected request: {} ({})", stage.name(), err.error_code(), err);
                return Err(err);
            }
        }
        Ok(())
    }
}
