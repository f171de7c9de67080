//! Object store publisher: writes the PDF only when its bytes changed.

pub mod handlers;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Reads the object at `key`; `NotFound` when nothing is stored there.
    async fn get(&self, key: &str) -> Result<Bytes, AppError>;

    async fn put(&self, key: &str, body: Bytes) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishOutcome {
    /// Nothing was stored at the key before.
    Created,
    /// A different object was overwritten.
    Updated,
    /// Identical bytes were already stored; no write happened.
    Unchanged,
}

#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Read-before-write publish. Not atomic: two concurrent publishers to the
    /// same key may both write.
    pub async fn publish(&self, key: &str, body: Bytes) -> Result<PublishOutcome, AppError> {
        let outcome = match self.store.get(key).await {
            Ok(existing) if existing == body => {
                info!("No PDF change at {key} ({} bytes), not updating", body.len());
                return Ok(PublishOutcome::Unchanged);
            }
            Ok(existing) => {
                info!(
                    "PDF at {key} changed ({} -> {} bytes), updating",
                    existing.len(),
                    body.len()
                );
                PublishOutcome::Updated
            }
            Err(AppError::NotFound(_)) => {
                info!("{key} does not exist yet, adding it");
                PublishOutcome::Created
            }
            Err(e) => return Err(e),
        };

        self.store.put(key, body).await?;
        Ok(outcome)
    }
}

/// `{u}/{u}_Resume_{year}.pdf`, where `u` is `user` with every whitespace
/// character replaced by `_`.
pub fn object_key(user: &str, year: i32) -> String {
    let user: String = user
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{user}/{user}_Resume_{year}.pdf")
}
