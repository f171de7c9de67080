//! Workflow trigger: starts an asynchronous run of the whole pipeline.

pub mod handlers;
pub mod pipeline;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::workflow::pipeline::Pipeline;

/// Prefix of execution names started through the HTTP API.
pub const EXECUTION_PREFIX: &str = "PipelineExecution";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub execution_id: String,
    pub started_at: DateTime<Utc>,
}

#[async_trait]
pub trait WorkflowTrigger: Send + Sync {
    /// Starts an execution and returns without waiting for it.
    async fn start(&self, name_hint: &str) -> Result<Execution, AppError>;
}

/// `{hint}-{unix millis}`.
pub fn execution_name(hint: &str, at: DateTime<Utc>) -> String {
    format!("{hint}-{}", at.timestamp_millis())
}

/// Runs executions as detached tasks on the current tokio runtime, always
/// for the configured résumé owner. Outcomes are only logged.
pub struct LocalWorkflow {
    pipeline: Pipeline,
    owner: String,
}

impl LocalWorkflow {
    pub fn new(pipeline: Pipeline, owner: impl Into<String>) -> Self {
        Self {
            pipeline,
            owner: owner.into(),
        }
    }
}

#[async_trait]
impl WorkflowTrigger for LocalWorkflow {
    async fn start(&self, name_hint: &str) -> Result<Execution, AppError> {
        let started_at = Utc::now();
        let execution_id = execution_name(name_hint, started_at);

        let pipeline = self.pipeline.clone();
        let owner = self.owner.clone();
        let id = execution_id.clone();
        tokio::spawn(async move {
            match pipeline.run(&owner, started_at.year()).await {
                Ok(report) => info!(
                    "Execution {id} published {} ({:?}, {} entries, {} bytes)",
                    report.key, report.outcome, report.entries, report.pdf_bytes
                ),
                Err(e) => error!("Execution {id} failed: {e}"),
            }
        });

        info!("Started execution {execution_id} for {}", self.owner);
        Ok(Execution {
            execution_id,
            started_at,
        })
    }
}
