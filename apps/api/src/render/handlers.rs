use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::document::PdfDocument;
use crate::prepare::GroupedEntries;
use crate::state::AppState;

/// POST /api/v1/generate
///
/// Renders Grouped Entries to a PDF and returns it base64-encoded.
pub async fn handle_generate(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<PdfDocument>, AppError> {
    let entries = grouped_entries_from(payload)?;
    let html = state.pipeline.renderer.render(&entries)?;
    let pdf = state.pipeline.rasterizer.render(&html).await?;
    info!("Generated résumé PDF for {} entries", entries.len());
    Ok(Json(PdfDocument::encode(&pdf)))
}

/// Accepts the grouped entries directly, as a JSON string, or wrapped the way
/// a chained invocation delivers them (`{"body": ...}` or
/// `{"responsePayload": {"body": ...}}`).
pub fn grouped_entries_from(payload: Value) -> Result<GroupedEntries, AppError> {
    let inner = match payload {
        Value::Object(mut fields) => {
            if let Some(body) = fields.remove("body") {
                body
            } else if let Some(body) = fields
                .get_mut("responsePayload")
                .and_then(|p| p.as_object_mut())
                .and_then(|p| p.remove("body"))
            {
                body
            } else {
                Value::Object(fields)
            }
        }
        other => other,
    };

    let inner = match inner {
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|e| AppError::Validation(format!("Body is not valid JSON: {e}")))?,
        other => other,
    };

    serde_json::from_value(inner).map_err(|e| AppError::DataShape(e.to_string()))
}
