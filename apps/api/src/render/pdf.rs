use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::AppError;

#[async_trait]
pub trait PdfRasterizer: Send + Sync {
    /// Prints an HTML document to PDF bytes.
    async fn render(&self, html: &str) -> Result<Bytes, AppError>;
}

/// Prints HTML with a headless Chromium, one browser process per call.
///
/// The browser and its scratch directory are owned by guards for the whole
/// call: the child is spawned with `kill_on_drop` and the directory is a
/// `TempDir`, so both go away on success, on error and on cancellation.
pub struct ChromiumRasterizer {
    executable: PathBuf,
}

impl ChromiumRasterizer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

#[async_trait]
impl PdfRasterizer for ChromiumRasterizer {
    async fn render(&self, html: &str) -> Result<Bytes, AppError> {
        let scratch = tempfile::tempdir()
            .map_err(|e| AppError::Render(format!("Failed to create scratch directory: {e}")))?;
        let page = scratch.path().join("resume.html");
        let output = scratch.path().join("resume.pdf");

        tokio::fs::write(&page, html)
            .await
            .map_err(|e| AppError::Render(format!("Failed to write page: {e}")))?;

        debug!("Launching {}", self.executable.display());
        let result = Command::new(&self.executable)
            .args([
                "--headless",
                "--disable-gpu",
                "--no-sandbox",
                "--no-pdf-header-footer",
                "--allow-file-access-from-files",
            ])
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", page.display()))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                AppError::Render(format!(
                    "Failed to launch browser '{}': {e}",
                    self.executable.display()
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(AppError::Render(format!(
                "Browser exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        let pdf = tokio::fs::read(&output)
            .await
            .map_err(|e| AppError::Render(format!("Browser produced no PDF: {e}")))?;
        if !pdf.starts_with(b"%PDF-") {
            return Err(AppError::Render("Browser output is not a PDF".to_string()));
        }

        info!("Rendered PDF ({} bytes)", pdf.len());
        Ok(Bytes::from(pdf))
    }
}
