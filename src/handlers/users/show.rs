// handlers/users/show.rs - GET /api/users/:id handler

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};

use crate::database::models::User;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

pub async fn user_show(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let mut ctx = RequestContext::new(&headers).with_path_id(id);
    state.pipelines.show_user.run(&mut ctx).await?;

    Ok(ApiResponse::success(ctx.take_user()?))
}
