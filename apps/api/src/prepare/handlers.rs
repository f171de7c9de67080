use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::prepare::{normalize, GroupedEntries};
use crate::state::AppState;

/// POST /api/v1/users/:user/prepare
///
/// Fetches `user`'s entries and returns them grouped, sorted and pruned,
/// ready to be posted to `/api/v1/generate`.
pub async fn handle_prepare(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<GroupedEntries>, AppError> {
    let raw = state.pipeline.records.fetch(&user).await?;
    let grouped = normalize(raw)?;
    let groups: Vec<String> = grouped
        .iter()
        .map(|(kind, entries)| format!("{kind}={}", entries.len()))
        .collect();
    info!("Prepared entries for {user}: {}", groups.join(", "));
    Ok(Json(grouped))
}
