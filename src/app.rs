use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, system, tasks, users};
use crate::state::AppState;

/// Full HTTP surface: banner and health at the root, the API under `/api`
pub fn app(state: AppState) -> Router {
    let api = &state.config.api;
    let body_limit = api.max_request_size_bytes;
    let enable_cors = api.enable_cors;
    let enable_request_logging = api.enable_request_logging;

    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/api", api_routes())
        .fallback(system::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(auth::authenticate))
        .route("/users", get(users::user_list).post(users::user_register))
        .route(
            "/users/:id",
            get(users::user_show)
                .patch(users::user_update)
                .delete(users::user_delete),
        )
        .route("/users/:id/set-admin", patch(users::user_set_admin))
        .route("/tasks", get(tasks::task_list).post(tasks::task_create))
        .route("/tasks/:id", patch(tasks::task_update).delete(tasks::task_delete))
}
