use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::models::document::PDF_CONTENT_TYPE;
use crate::publish::ObjectStore;

/// One S3 bucket (or MinIO, via a custom endpoint).
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(GetObjectError::NoSuchKey(_)) => {
                    AppError::NotFound(format!("s3://{}/{key}", self.bucket))
                }
                _ => AppError::Transport(format!("S3 get_object failed: {}", DisplayErrorContext(&e))),
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::Transport(format!("S3 object read failed: {e}")))?;
        Ok(data.into_bytes())
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<(), AppError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(PDF_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("S3 put_object failed: {}", DisplayErrorContext(&e))))?;

        info!("Uploaded {size} bytes to s3://{}/{key}", self.bucket);
        Ok(())
    }
}
