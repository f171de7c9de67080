//! Fixtures and in-memory collaborators shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::publish::{ObjectStore, Publisher};
use crate::records::{keyed_item, RecordStore};
use crate::render::pdf::PdfRasterizer;
use crate::render::template::TemplateRenderer;
use crate::state::AppState;
use crate::workflow::pipeline::Pipeline;
use crate::workflow::LocalWorkflow;

// ── Record fixtures ───────────────────────────────────────────────────────

pub fn skill(title: &str, proficiency: f64) -> Value {
    json!({
        "type": "skills",
        "title": title,
        "details": { "proficiency": proficiency }
    })
}

pub fn employment(title: &str, end_date: &str) -> Value {
    json!({
        "type": "employment",
        "title": title,
        "startDate": "2010-01",
        "endDate": end_date,
        "details": {
            "position": "Engineer",
            "description": [format!("Shipped {title}"), "Mentored 3 engineers"]
        }
    })
}

pub fn project(title: &str, end_date: &str) -> Value {
    json!({
        "type": "projects",
        "title": title,
        "endDate": end_date,
        "details": {
            "projectSource": format!("github.com/{title}"),
            "description": [format!("Did {title}")]
        }
    })
}

pub fn bio(name: &str) -> Value {
    json!({
        "type": "bio",
        "title": name,
        "details": {
            "subtitle": "Software Engineer",
            "social": [{ "name": "GitHub", "url": "https://github.com/alecwest" }]
        }
    })
}

pub fn sample_resume() -> Vec<Value> {
    vec![
        bio("Alec West"),
        employment("Initech", "present"),
        employment("Acme", "2019-06"),
        project("resume-site", "2023"),
        skill("Rust", 9.0),
        skill("Go", 8.0),
    ]
}

// ── Record store ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRecordStore {
    entries: Mutex<HashMap<String, Vec<Value>>>,
}

impl InMemoryRecordStore {
    pub fn with_entries(user: &str, entries: Vec<Value>) -> Self {
        let store = Self::default();
        store.lock().insert(user.to_string(), entries);
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Value>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch(&self, user: &str) -> Result<Vec<Value>, AppError> {
        self.lock()
            .get(user)
            .filter(|items| !items.is_empty())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No résumé entries for user '{user}'")))
    }

    async fn put(&self, user: &str, item: Value) -> Result<(), AppError> {
        let keyed = keyed_item(user, item)?;
        let mut entries = self.lock();
        let items = entries.entry(user.to_string()).or_default();
        items.retain(|existing| existing["id"] != keyed.item["id"]);
        items.push(keyed.item);
        Ok(())
    }
}

// ── Object store ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
    puts: AtomicUsize,
    unavailable: bool,
}

impl InMemoryObjectStore {
    pub fn with_object(key: &str, body: &'static [u8]) -> Self {
        let store = Self::default();
        store.lock().insert(key.to_string(), Bytes::from_static(body));
        store
    }

    /// Every read fails with a transport error.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Bytes>> {
        self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        if self.unavailable {
            return Err(AppError::Transport("object store unavailable".to_string()));
        }
        self.object(key)
            .ok_or_else(|| AppError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<(), AppError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.lock().insert(key.to_string(), body);
        Ok(())
    }
}

// ── Rasterizer ────────────────────────────────────────────────────────────

/// Deterministic stand-in for a browser: the "PDF" embeds the HTML.
pub struct StubRasterizer;

#[async_trait]
impl PdfRasterizer for StubRasterizer {
    async fn render(&self, html: &str) -> Result<Bytes, AppError> {
        Ok(Bytes::from(format!("%PDF-1.7\n{html}")))
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────

pub fn test_pipeline(records: Arc<dyn RecordStore>, objects: Arc<dyn ObjectStore>) -> Pipeline {
    Pipeline {
        records,
        renderer: TemplateRenderer::new().unwrap_or_else(|e| panic!("{e}")),
        rasterizer: Arc::new(StubRasterizer),
        publisher: Publisher::new(objects),
    }
}

pub fn test_state(records: Arc<InMemoryRecordStore>, objects: Arc<InMemoryObjectStore>) -> AppState {
    let pipeline = test_pipeline(records.clone(), objects);
    AppState {
        entries: records,
        workflow: Arc::new(LocalWorkflow::new(pipeline.clone(), "Alec West")),
        pipeline,
    }
}
