// handlers/users/list.rs - GET /api/users handler

use axum::{extract::State, http::HeaderMap};

use crate::database::models::User;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

pub async fn user_list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<User>> {
    let mut ctx = RequestContext::new(&headers);
    state.pipelines.list_users.run(&mut ctx).await?;

    Ok(ApiResponse::success(state.store.list_users().await?))
}
