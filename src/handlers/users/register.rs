// handlers/users/register.rs - POST /api/users handler

use axum::{body::Bytes, extract::State, http::HeaderMap};

use crate::auth::hash_password;
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

/// Create an account and log it straight in via the `x-auth-token` header
pub async fn user_register(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ApiResult<User> {
    let mut ctx = RequestContext::new(&headers).with_body(body);
    state.pipelines.register.run(&mut ctx).await?;
    let draft: NewUser = ctx.payload_as()?;

    if state.store.find_user_by_email(&draft.email).await?.is_some() {
        return Err(ApiError::uniqueness_conflict("User with given email already exists"));
    }
    if state.store.find_user_by_username(&draft.username).await?.is_some() {
        return Err(ApiError::uniqueness_conflict("User with given username already exists"));
    }

    let hash = hash_password(draft.password, state.config.security.bcrypt_cost).await?;
    let user = User::new(draft.username, draft.email, hash);
    state.store.insert_user(&user).await?;

    let token = state.tokens.issue(&user)?;
    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok(ApiResponse::success(user).with_token(token))
}
