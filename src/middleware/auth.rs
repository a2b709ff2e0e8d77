use async_trait::async_trait;

use super::{RequestContext, Stage, TokenHeader};
use crate::auth::TokenService;
use crate::error::ApiError;

/// Token verification stage: turns the `x-auth-token` header into an identity
#[derive(Clone)]
pub struct TokenVerifier {
    tokens: TokenService,
}

impl TokenVerifier {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl Stage for TokenVerifier {
    fn name(&self) -> &'static str {
        "token"
    }

    async fn check(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        let token = match &ctx.token {
            TokenHeader::Missing => return Err(ApiError::unauthenticated("No token provided")),
            TokenHeader::Unreadable => return Err(ApiError::invalid_token("Invalid token provided")),
            TokenHeader::Value(token) => token.trim(),
        };

        if token.is_empty() {
            return Err(ApiError::unauthenticated("No token provided"));
        }

        let identity = self.tokens.verify(token).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            ApiError::invalid_token("Invalid token provided")
        })?;

        ctx.identity = Some(identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TOKEN_HEADER;
    use crate::config::AppConfig;
    use crate::database::models::User;
    use axum::http::{HeaderMap, HeaderValue};

    fn verifier() -> (TokenVerifier, TokenService) {
        let tokens = TokenService::new(&AppConfig::test().security).unwrap();
        (TokenVerifier::new(tokens.clone()), tokens)
    }

    fn context_with(token: &str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_str(token).unwrap());
        RequestContext::new(&headers)
    }

    #[tokio::test]
    async fn valid_token_sets_identity() {
        let (stage, tokens) = verifier();
        let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
        let mut ctx = context_with(&tokens.issue(&user).unwrap());

        stage.check(&mut ctx).await.unwrap();

        assert_eq!(ctx.identity.unwrap().subject, user.id);
    }

    #[tokio::test]
    async fn missing_or_empty_token_is_unauthenticated() {
        let (stage, _) = verifier();

        let err = stage.check(&mut RequestContext::new(&HeaderMap::new())).await.unwrap_err();
        assert_eq!(err, ApiError::unauthenticated("No token provided"));

        let err = stage.check(&mut context_with("")).await.unwrap_err();
        assert_eq!(err, ApiError::unauthenticated("No token provided"));
    }

    #[tokio::test]
    async fn unreadable_header_is_invalid() {
        let (stage, _) = verifier();
        let mut ctx = RequestContext {
            token: TokenHeader::Unreadable,
            ..Default::default()
        };

        let err = stage.check(&mut ctx).await.unwrap_err();

        assert_eq!(err, ApiError::invalid_token("Invalid token provided"));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let (stage, _) = verifier();
        let mut ctx = context_with("a");

        let err = stage.check(&mut ctx).await.unwrap_err();

        assert_eq!(err, ApiError::invalid_token("Invalid token provided"));
        assert!(ctx.identity.is_none());
    }
}
