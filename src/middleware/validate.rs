use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{RequestContext, Stage};
use crate::error::ApiError;
use crate::schema::Schema;

/// Checks the request body against a rule table and stores the cleaned payload
#[derive(Debug, Clone)]
pub struct BodyValidator {
    schema: Arc<Schema>,
}

impl BodyValidator {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }
}

#[async_trait]
impl Stage for BodyValidator {
    fn name(&self) -> &'static str {
        self.schema.name
    }

    async fn check(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        // An absent body reads as an empty object
        let body: Value = if ctx.body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(&ctx.body)
                .map_err(|e| ApiError::validation_failed(format!("Malformed JSON body: {}", e)))?
        };

        let payload = self.schema.validate(&body).map_err(ApiError::validation_failed)?;
        ctx.payload = Some(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables;
    use axum::body::Bytes;
    use serde_json::json;

    fn context(body: &'static str) -> RequestContext {
        RequestContext::default().with_body(Bytes::from_static(body.as_bytes()))
    }

    #[tokio::test]
    async fn valid_body_is_cleaned_into_payload() {
        let stage = BodyValidator::new(tables::task_create());
        let mut ctx = context(r#"{"name":"  groceries ","user":{"userId":"x"}}"#);

        stage.check(&mut ctx).await.unwrap();

        let payload = ctx.payload.unwrap();
        assert_eq!(payload.get("name"), Some(&json!("groceries")));
        assert!(!payload.contains_key("user"));
    }

    #[tokio::test]
    async fn empty_body_fails_required_fields() {
        let stage = BodyValidator::new(tables::task_create());
        let err = stage.check(&mut context("")).await.unwrap_err();
        assert_eq!(err, ApiError::validation_failed("\"name\" is required"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_failure() {
        let stage = BodyValidator::new(tables::user_create());
        let err = stage.check(&mut context("{not json")).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationFailed(_)));
    }
}
