mod config;
mod db;
mod errors;
mod extract;
mod models;
mod prepare;
mod publish;
mod records;
mod render;
mod routes;
mod state;
#[cfg(test)]
mod testing;
mod workflow;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, RecordBackend};
use crate::db::create_pool;
use crate::publish::s3::S3ObjectStore;
use crate::publish::Publisher;
use crate::records::http::HttpRecordStore;
use crate::records::postgres::PgRecordStore;
use crate::records::RecordStore;
use crate::render::pdf::ChromiumRasterizer;
use crate::render::template::TemplateRenderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::pipeline::Pipeline;
use crate::workflow::LocalWorkflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting résumé API v{}", env!("CARGO_PKG_VERSION"));

    // Entry store: local PostgreSQL, or the remote résumé-data API
    let records: Arc<dyn RecordStore> = match &config.records {
        RecordBackend::Postgres { database_url } => {
            let db = create_pool(database_url).await?;
            Arc::new(PgRecordStore::new(db))
        }
        RecordBackend::Remote { base_url, api_key } => {
            info!("Entries are served by {base_url}");
            Arc::new(HttpRecordStore::new(base_url, api_key.clone())?)
        }
    };

    // Object storage (S3 / MinIO)
    let s3 = build_s3_client(&config).await;
    let objects = Arc::new(S3ObjectStore::new(s3, config.s3_bucket.clone()));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let pipeline = Pipeline {
        records: records.clone(),
        renderer: TemplateRenderer::new()?,
        rasterizer: Arc::new(ChromiumRasterizer::new(&config.chromium_path)),
        publisher: Publisher::new(objects),
    };
    let workflow = Arc::new(LocalWorkflow::new(
        pipeline.clone(),
        config.resume_owner.clone(),
    ));

    let state = AppState {
        entries: records,
        pipeline,
        workflow,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for AWS, or for MinIO when `S3_ENDPOINT` is set.
/// Static credentials are used only when both keys are configured; otherwise
/// the default AWS provider chain applies.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()));

    if let (Some(key_id), Some(secret)) = (&config.aws_access_key_id, &config.aws_secret_access_key)
    {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "resume-api-static",
        ));
    }
    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let shared = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(config.s3_endpoint.is_some())
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
