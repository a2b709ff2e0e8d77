// handlers/tasks/delete.rs - DELETE /api/tasks/:id handler

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Serialize;

use crate::database::models::Task;
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeletedTask {
    pub deleted: Task,
}

pub async fn task_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<DeletedTask> {
    let mut ctx = RequestContext::new(&headers).with_path_id(id);
    state.pipelines.delete_task.run(&mut ctx).await?;
    let task = ctx.take_task()?;

    state.store.delete_task(task.id).await?;

    Ok(ApiResponse::success(DeletedTask { deleted: task }))
}
