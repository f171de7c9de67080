use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::records::auth::{authorize_edit, CallerClaims};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    #[serde(rename = "Items")]
    pub items: Vec<Value>,
    #[serde(rename = "Count")]
    pub count: usize,
}

/// GET /resume/:user
pub async fn handle_get_entries(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<EntriesResponse>, AppError> {
    let items = state.entries.fetch(&user).await?;
    Ok(Json(EntriesResponse {
        count: items.len(),
        items,
    }))
}

/// POST /resume/:user
///
/// Inserts or overwrites one entry. The caller must be entitled to edit
/// `user`'s entries.
pub async fn handle_put_entry(
    State(state): State<AppState>,
    Path(user): Path<String>,
    claims: CallerClaims,
    JsonBody(item): JsonBody<Value>,
) -> Result<StatusCode, AppError> {
    authorize_edit(&claims, &user)?;
    state.entries.put(&user, item).await?;
    Ok(StatusCode::NO_CONTENT)
}
