// handlers/tasks/update.rs - PATCH /api/tasks/:id handler

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};

use crate::database::models::{Task, TaskPatch};
use crate::error::ApiError;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

pub async fn task_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Task> {
    let mut ctx = RequestContext::new(&headers).with_path_id(id).with_body(body);
    state.pipelines.update_task.run(&mut ctx).await?;
    let mut task = ctx.take_task()?;
    let patch: TaskPatch = ctx.payload_as()?;

    task.apply(patch);
    if !state.store.update_task(&task).await? {
        return Err(ApiError::not_found("Task not found"));
    }

    Ok(ApiResponse::success(task))
}
