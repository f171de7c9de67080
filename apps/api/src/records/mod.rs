//! Record store: where résumé entries live, and the CRUD API in front of it.
//!
//! `RecordStore` is the seam the pipeline reads through. `PgRecordStore` is the
//! local datastore; `HttpRecordStore` reads another deployment's data API.

pub mod auth;
pub mod handlers;
pub mod http;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::entry::{Entry, EntryKind};

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every raw entry stored for `user`, or `NotFound` if there are none.
    async fn fetch(&self, user: &str) -> Result<Vec<Value>, AppError>;

    /// Inserts `item`, overwriting any entry for `user` with the same `id`.
    async fn put(&self, user: &str, item: Value) -> Result<(), AppError>;
}

/// An item ready to be written: validated, owned by `user`, and keyed.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedItem {
    pub entry_id: String,
    pub kind: EntryKind,
    pub item: Value,
}

/// Validates `item` as an `Entry` before it is stored, stamps the owning
/// user onto it, and assigns a fresh `id` when the caller did not send one.
pub fn keyed_item(user: &str, item: Value) -> Result<KeyedItem, AppError> {
    let Value::Object(mut fields) = item else {
        return Err(AppError::DataShape("entry must be a JSON object".to_string()));
    };

    let entry_id = match fields.get("id") {
        None | Some(Value::Null) => Uuid::new_v4().to_string(),
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        Some(other) => {
            return Err(AppError::DataShape(format!(
                "`id` must be a non-empty string, got {other}"
            )))
        }
    };
    fields.insert("id".to_string(), Value::String(entry_id.clone()));
    fields.insert("user".to_string(), Value::String(user.to_string()));

    let item = Value::Object(fields);
    let entry = Entry::try_from(item.clone())?;

    Ok(KeyedItem {
        entry_id,
        kind: entry.kind,
        item,
    })
}
