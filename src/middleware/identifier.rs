use async_trait::async_trait;
use uuid::Uuid;

use super::{RequestContext, Stage};
use crate::error::ApiError;

pub const INVALID_ID_MESSAGE: &str = "ERROR 400, ID is invalid";

/// Rejects path ids that cannot be an entity key
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierValidator;

#[async_trait]
impl Stage for IdentifierValidator {
    fn name(&self) -> &'static str {
        "identifier"
    }

    async fn check(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        let raw = ctx.raw_id.as_deref().unwrap_or_default();
        let id = Uuid::parse_str(raw).map_err(|_| ApiError::malformed_identifier(INVALID_ID_MESSAGE))?;
        ctx.id = Some(id);
        Ok(())
    }
}
