// handlers/users/set_admin.rs - PATCH /api/users/:id/set-admin handler

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};

use crate::database::models::{AdminFlag, User};
use crate::error::ApiError;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

/// Grant or revoke administrator rights (administrators only)
pub async fn user_set_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<User> {
    let mut ctx = RequestContext::new(&headers).with_path_id(id).with_body(body);
    state.pipelines.set_admin.run(&mut ctx).await?;
    let mut user = ctx.take_user()?;
    let flag: AdminFlag = ctx.payload_as()?;

    user.set_admin(flag.is_admin);
    if !state.store.update_user(&user).await? {
        return Err(ApiError::not_found("User not found"));
    }

    if let Ok(admin) = ctx.identity() {
        tracing::info!("{} set isAdmin={} on {}", admin.username, flag.is_admin, user.username);
    }

    Ok(ApiResponse::success(user))
}
