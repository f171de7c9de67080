use std::sync::Arc;

use crate::records::RecordStore;
use crate::workflow::pipeline::Pipeline;
use crate::workflow::WorkflowTrigger;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Local entry store behind the `/resume/:user` CRUD API.
    pub entries: Arc<dyn RecordStore>,
    /// Stage collaborators; `pipeline.records` may point at a remote data API.
    pub pipeline: Pipeline,
    pub workflow: Arc<dyn WorkflowTrigger>,
}
