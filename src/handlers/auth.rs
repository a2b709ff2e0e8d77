// handlers/auth.rs - POST /api/auth handler

use axum::{body::Bytes, extract::State, http::HeaderMap};

use crate::auth::verify_password;
use crate::database::models::Credentials;
use crate::error::ApiError;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

/// Exchange credentials for a token.
///
/// Unknown account and wrong password share one deliberately generic 401, so
/// callers cannot tell which usernames or emails exist.
pub async fn authenticate(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ApiResult<String> {
    let mut ctx = RequestContext::new(&headers).with_body(body);
    state.pipelines.authenticate.run(&mut ctx).await?;
    let credentials: Credentials = ctx.payload_as()?;

    let user = match (&credentials.email, &credentials.username) {
        (Some(email), _) => state.store.find_user_by_email(email).await?,
        (None, Some(username)) => state.store.find_user_by_username(username).await?,
        (None, None) => None,
    };

    let Some(user) = user else {
        tracing::info!("Login failed: unknown account");
        return Err(ApiError::invalid_credentials());
    };

    if !verify_password(credentials.password, user.password.clone()).await? {
        tracing::info!("Login failed: wrong password for {}", user.username);
        return Err(ApiError::invalid_credentials());
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!("User {} logged in", user.username);

    Ok(ApiResponse::success(token.clone()).with_token(token))
}
