use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::document::PdfDocument;
use crate::publish::{object_key, PublishOutcome};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub key: String,
    pub outcome: PublishOutcome,
}

/// POST /api/v1/users/:user/publish
///
/// Takes the envelope `/api/v1/generate` returns and stores the PDF under
/// this year's key for `user`.
pub async fn handle_publish(
    State(state): State<AppState>,
    Path(user): Path<String>,
    JsonBody(document): JsonBody<PdfDocument>,
) -> Result<Json<PublishResponse>, AppError> {
    let pdf = document.decode()?;
    let key = object_key(&user, Utc::now().year());
    let outcome = state.pipeline.publisher.publish(&key, pdf).await?;
    Ok(Json(PublishResponse { key, outcome }))
}
