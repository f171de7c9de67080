use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::prepare::normalize;
use crate::publish::{object_key, PublishOutcome, Publisher};
use crate::records::RecordStore;
use crate::render::pdf::PdfRasterizer;
use crate::render::template::TemplateRenderer;

/// The collaborators of one résumé publishing run, wired once at startup.
#[derive(Clone)]
pub struct Pipeline {
    pub records: Arc<dyn RecordStore>,
    pub renderer: TemplateRenderer,
    pub rasterizer: Arc<dyn PdfRasterizer>,
    pub publisher: Publisher,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub key: String,
    pub outcome: PublishOutcome,
    pub entries: usize,
    pub pdf_bytes: usize,
}

impl Pipeline {
    /// fetch → normalize → render → rasterize → publish, strictly in order.
    /// The first failing stage ends the run; nothing is retried.
    pub async fn run(&self, user: &str, year: i32) -> Result<PipelineReport, AppError> {
        let raw = self.records.fetch(user).await?;
        info!("Fetched {} entries for {user}", raw.len());

        let grouped = normalize(raw)?;
        let html = self.renderer.render(&grouped)?;
        let pdf = self.rasterizer.render(&html).await?;
        let pdf_bytes = pdf.len();

        let key = object_key(user, year);
        let outcome = self.publisher.publish(&key, pdf).await?;

        Ok(PipelineReport {
            key,
            outcome,
            entries: grouped.len(),
            pdf_bytes,
        })
    }
}
