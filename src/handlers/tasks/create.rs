// handlers/tasks/create.rs - POST /api/tasks handler

use axum::{body::Bytes, extract::State, http::HeaderMap};

use crate::database::models::{NewTask, OwnerRef, Task};
use crate::middleware::response::ApiResult;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

/// The owner always comes from the verified token, never from the body
pub async fn task_create(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ApiResult<Task> {
    let mut ctx = RequestContext::new(&headers).with_body(body);
    state.pipelines.create_task.run(&mut ctx).await?;
    let draft: NewTask = ctx.payload_as()?;
    let owner = OwnerRef::from(ctx.identity()?);

    let task = Task::new(draft, owner);
    state.store.insert_task(&task).await?;
    tracing::debug!("Created task {} for {}", task.id, task.user.username);

    Ok(ApiResponse::success(task))
}
