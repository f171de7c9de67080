use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::{Execution, EXECUTION_PREFIX};

/// POST /api/v1/executions
///
/// Starts a publishing run for the configured résumé owner. Takes no input.
pub async fn handle_start_execution(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Execution>), AppError> {
    let execution = state.workflow.start(EXECUTION_PREFIX).await?;
    Ok((StatusCode::ACCEPTED, Json(execution)))
}
