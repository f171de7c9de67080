use anyhow::{Context, Result};

/// Where résumé entries are read from and written to.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBackend {
    /// Local `resume_entries` table (`DATABASE_URL`).
    Postgres { database_url: String },
    /// Remote résumé-data API (`RESUME_DATA_URL`); the entry endpoints and
    /// the pipeline both go through it.
    Remote {
        base_url: String,
        api_key: Option<String>,
    },
}

impl RecordBackend {
    fn from_env() -> Result<Self> {
        Self::resolve(optional_env)
    }

    /// A configured `RESUME_DATA_URL` selects the remote API; otherwise
    /// `DATABASE_URL` is required.
    fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match lookup("RESUME_DATA_URL") {
            Some(base_url) => Ok(RecordBackend::Remote {
                base_url,
                api_key: lookup("RESUME_DATA_API_KEY"),
            }),
            None => lookup("DATABASE_URL")
                .map(|database_url| RecordBackend::Postgres { database_url })
                .context("Required environment variable 'DATABASE_URL' is not set"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub records: RecordBackend,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>,
    pub aws_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    /// Whose résumé a workflow execution publishes.
    pub resume_owner: String,
    pub chromium_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            records: RecordBackend::from_env()?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: optional_env("S3_ENDPOINT"),
            aws_region: optional_env("AWS_REGION").unwrap_or_else(|| "us-east-2".to_string()),
            aws_access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            resume_owner: require_env("RESUME_OWNER")?,
            chromium_path: optional_env("CHROMIUM_PATH").unwrap_or_else(|| "chromium".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
