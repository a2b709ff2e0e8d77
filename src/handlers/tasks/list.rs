// handlers/tasks/list.rs - GET /api/tasks handler

use axum::{extract::State, http::HeaderMap};

use crate::database::models::Task;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

/// Only the caller's own tasks, whatever their role
pub async fn task_list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<Task>> {
    let mut ctx = RequestContext::new(&headers);
    state.pipelines.list_tasks.run(&mut ctx).await?;
    let owner = ctx.identity()?.subject;

    Ok(ApiResponse::success(state.store.tasks_for_owner(owner).await?))
}
