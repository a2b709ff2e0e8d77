// handlers/users/update.rs - PATCH /api/users/:id handler

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};

use crate::auth::hash_password;
use crate::database::models::{User, UserChanges, UserPatch};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

/// Partial update of the caller's own account. Admins get no exemption here.
pub async fn user_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<User> {
    let mut ctx = RequestContext::new(&headers).with_path_id(id).with_body(body);
    state.pipelines.update_user.run(&mut ctx).await?;
    let mut user = ctx.take_user()?;
    let patch: UserPatch = ctx.payload_as()?;

    // Holding your own email or username is not a conflict
    if let Some(email) = &patch.email {
        if let Some(holder) = state.store.find_user_by_email(email).await? {
            if holder.id != user.id {
                return Err(conflict("email"));
            }
        }
    }
    if let Some(username) = &patch.username {
        if let Some(holder) = state.store.find_user_by_username(username).await? {
            if holder.id != user.id {
                return Err(conflict("username"));
            }
        }
    }

    let password_hash = match patch.password {
        Some(password) => Some(hash_password(password, state.config.security.bcrypt_cost).await?),
        None => None,
    };

    user.apply(UserChanges {
        username: patch.username,
        email: patch.email,
        password_hash,
    });

    if !state.store.update_user(&user).await.map_err(map_update_error)? {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(ApiResponse::success(user))
}

fn conflict(field: &str) -> ApiError {
    ApiError::uniqueness_conflict(format!("ERROR 400, user with given {} already exists", field))
}

/// A concurrent writer can still take the email or username between the
/// check above and the write; report that the same way as the check does
fn map_update_error(err: StoreError) -> ApiError {
    match err {
        StoreError::Duplicate(field) => conflict(&field),
        other => other.into(),
    }
}
