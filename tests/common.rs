//! Shared test doubles: scripted oracle, mock renderer, in-memory stores.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use visaprep_server::appdata::{DataBag, FieldValue};
use visaprep_server::db::{AppState, InMemoryApplicationDataStore, InMemoryDocumentStore};
use visaprep_server::generation::models::GenerationStatusResponse;
use visaprep_server::generators::{DocumentLayout, PdfRenderer, RenderError};
use visaprep_server::oracle::{OracleError, TextOracle};

/// Oracle returning pre-scripted responses in call order; exhausted scripts
/// fail like a flaky upstream would.
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedOracle {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
        }
    }
}

#[async_trait]
impl TextOracle for ScriptedOracle {
    async fn generate_text(&self, _prompt: &str) -> Result<String, OracleError> {
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| OracleError::Request("script exhausted".to_string()))
    }
}

/// Oracle that always fails; generators must degrade, never error.
pub struct FailingOracle;

#[async_trait]
impl TextOracle for FailingOracle {
    async fn generate_text(&self, _prompt: &str) -> Result<String, OracleError> {
        Err(OracleError::Request("oracle unreachable".to_string()))
    }
}

/// Oracle that stalls before failing, to keep a job live long enough for
/// concurrency tests.
pub struct SlowOracle {
    pub delay: Duration,
}

#[async_trait]
impl TextOracle for SlowOracle {
    async fn generate_text(&self, _prompt: &str) -> Result<String, OracleError> {
        tokio::time::sleep(self.delay).await;
        Err(OracleError::Request("oracle unreachable".to_string()))
    }
}

/// Renderer that writes marker bytes instead of compiling Typst, records
/// every layout it saw, and can be told to fail specific documents by title.
#[derive(Default)]
pub struct MockPdfRenderer {
    pub fail_titles: Vec<String>,
    rendered: Mutex<Vec<(String, String)>>,
}

impl MockPdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(titles: &[&str]) -> Self {
        Self {
            fail_titles: titles.iter().map(|t| t.to_string()).collect(),
            rendered: Mutex::new(Vec::new()),
        }
    }

    /// Flattened text of the layout rendered under `title`, if any.
    pub fn rendered_text(&self, title: &str) -> Option<String> {
        self.rendered
            .lock()
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, text)| text.clone())
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.lock().len()
    }
}

#[async_trait]
impl PdfRenderer for MockPdfRenderer {
    async fn render(&self, layout: &DocumentLayout, output_path: &Path) -> Result<u64, RenderError> {
        if self.fail_titles.iter().any(|t| t == &layout.title) {
            return Err(RenderError::TypstExit(1));
        }

        self.rendered
            .lock()
            .push((layout.title.clone(), layout.plain_text()));

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(RenderError::OutputIo)?;
        }
        let bytes = b"%PDF-1.4 mock document";
        std::fs::write(output_path, bytes).map_err(RenderError::OutputIo)?;
        Ok(bytes.len() as u64)
    }
}

/// Fully wired in-memory server state plus handles on the fakes.
pub struct TestHarness {
    pub state: AppState,
    pub data_store: Arc<InMemoryApplicationDataStore>,
    pub document_store: Arc<InMemoryDocumentStore>,
    pub renderer: Arc<MockPdfRenderer>,
    _docs_dir: tempfile::TempDir,
}

pub fn harness(oracle: Arc<dyn TextOracle>, renderer: MockPdfRenderer) -> TestHarness {
    let data_store = Arc::new(InMemoryApplicationDataStore::new());
    let document_store = Arc::new(InMemoryDocumentStore::new());
    let renderer = Arc::new(renderer);
    let docs_dir = tempfile::tempdir().expect("temp dir");

    let state = AppState::new_with_parts(
        data_store.clone(),
        document_store.clone(),
        oracle,
        renderer.clone(),
        docs_dir.path().to_path_buf(),
    );

    TestHarness {
        state,
        data_store,
        document_store,
        renderer,
        _docs_dir: docs_dir,
    }
}

/// Poll status until the job reaches a terminal state.
pub async fn wait_until_terminal(state: &AppState, application_id: Uuid) -> GenerationStatusResponse {
    for _ in 0..400 {
        let status = state
            .orchestrator
            .get_status(application_id)
            .await
            .expect("status query");
        if status.status == "completed" || status.status == "failed" {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("generation job did not reach a terminal state in time");
}

pub fn bag(entries: &[(&str, FieldValue)]) -> DataBag {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
