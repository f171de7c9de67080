pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::prepare::handlers::handle_prepare;
use crate::publish::handlers::handle_publish;
use crate::records::handlers::{handle_get_entries, handle_put_entry};
use crate::render::handlers::handle_generate;
use crate::state::AppState;
use crate::workflow::handlers::handle_start_execution;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Record store data API
        .route(
            "/resume/:user",
            get(handle_get_entries).post(handle_put_entry),
        )
        // Pipeline stages, each invocable on its own
        .route("/api/v1/users/:user/prepare", post(handle_prepare))
        .route("/api/v1/generate", post(handle_generate))
        .route("/api/v1/users/:user/publish", post(handle_publish))
        // Workflow
        .route("/api/v1/executions", post(handle_start_execution))
        .with_state(state)
}
