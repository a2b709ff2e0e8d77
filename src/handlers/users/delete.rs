// handlers/users/delete.rs - DELETE /api/users/:id handler

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Serialize;

use crate::database::models::User;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeletedUser {
    pub deleted: User,
}

pub async fn user_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<DeletedUser> {
    let mut ctx = RequestContext::new(&headers).with_path_id(id);
    state.pipelines.delete_user.run(&mut ctx).await?;
    let user = ctx.take_user()?;

    state.store.delete_user(user.id).await?;
    tracing::info!("Deleted user {} ({})", user.username, user.id);

    Ok(ApiResponse::success(DeletedUser { deleted: user }))
}
