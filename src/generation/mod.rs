//! Generation orchestrator.
//!
//! Drives the eight per-document generators for one application as a single
//! background task: loads the application snapshot once, auto-fills the
//! answer bag, then runs the generators strictly sequentially. Each
//! generator's failure is recorded and the batch continues; only an
//! orchestration-level failure (context cannot be loaded at all) marks the
//! whole job failed.

pub mod handlers;
pub mod models;
pub mod session;

pub use models::{
    DocumentStatus, DocumentStore, GeneratedDocumentRecord, GeneratedDocumentSummary,
    GenerationStatusResponse,
};
pub use session::{AlreadyRunning, GenerationSession, JobStatus, SessionStore};

use crate::appdata::{ApplicationContext, ApplicationDataStore, StoreError};
use crate::autofill::{AutoFillEngine, AutoFillError};
use crate::generators::{
    all_generators, produce_document, DocumentType, GenerationContext, PdfRenderer,
};
use crate::oracle::TextOracle;
use chrono::Utc;
use lazy_static::lazy_static;
use log::{error, info, warn};
use prometheus::{register_int_counter, IntCounter};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

lazy_static! {
    static ref DOCUMENTS_GENERATED: IntCounter = register_int_counter!(
        "visaprep_documents_generated_total",
        "Documents generated successfully"
    )
    .unwrap();
    static ref DOCUMENTS_FAILED: IntCounter = register_int_counter!(
        "visaprep_documents_failed_total",
        "Per-document generation failures"
    )
    .unwrap();
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    AlreadyRunning(#[from] AlreadyRunning),
    #[error("could not load application data: {0}")]
    Load(#[from] StoreError),
    #[error(transparent)]
    AutoFill(#[from] AutoFillError),
    #[error("document not found")]
    DocumentNotFound,
}

/// Owns everything a generation job needs; shared across requests via `Arc`.
pub struct GenerationOrchestrator {
    data_store: Arc<dyn ApplicationDataStore>,
    document_store: Arc<dyn DocumentStore>,
    oracle: Arc<dyn TextOracle>,
    renderer: Arc<dyn PdfRenderer>,
    sessions: SessionStore,
    documents_dir: PathBuf,
}

impl GenerationOrchestrator {
    pub fn new(
        data_store: Arc<dyn ApplicationDataStore>,
        document_store: Arc<dyn DocumentStore>,
        oracle: Arc<dyn TextOracle>,
        renderer: Arc<dyn PdfRenderer>,
        documents_dir: PathBuf,
    ) -> Self {
        Self {
            data_store,
            document_store,
            oracle,
            renderer,
            sessions: SessionStore::new(),
            documents_dir,
        }
    }

    /// Start a generation job, returning the initial status snapshot.
    /// Rejects when a job for the same application is still live; a terminal
    /// prior job is superseded by a fresh attempt with fresh records.
    pub async fn start_generation(
        self: &Arc<Self>,
        application_id: Uuid,
    ) -> Result<GenerationStatusResponse, GenerationError> {
        let attempt = Uuid::new_v4();
        let total = DocumentType::ALL.len();
        let session = self.sessions.begin(application_id, attempt, total).await?;

        info!("starting generation job {attempt} for application {application_id}");

        let orchestrator = Arc::clone(self);
        let job_session = session.clone();
        tokio::spawn(async move {
            orchestrator.run_job(application_id, attempt, job_session).await;
        });

        let initial = snapshot(&session.read());
        Ok(initial)
    }

    /// The background job body. Never panics the task: every failure path
    /// lands in the session.
    async fn run_job(&self, application_id: Uuid, attempt: Uuid, session: session::SharedSession) {
        let context = match self.load_context(application_id).await {
            Ok(context) => context,
            Err(err) => {
                // orchestration-level failure: whole job is failed
                error!("generation job for {application_id} could not load data: {err}");
                let mut s = session.write();
                s.status = JobStatus::Failed;
                s.errors.push(err.to_string());
                s.completed_at = Some(Utc::now());
                return;
            }
        };

        {
            let mut s = session.write();
            s.status = JobStatus::Generating;
        }

        let ctx = GenerationContext {
            application_id,
            data: context,
            oracle: self.oracle.clone(),
        };

        let total = DocumentType::ALL.len();
        for generator in all_generators() {
            let document_type = generator.document_type();
            {
                let mut s = session.write();
                s.current_document = Some(document_type.display_name().to_string());
            }

            let result = produce_document(
                generator.as_ref(),
                &ctx,
                attempt,
                &self.document_store,
                &self.renderer,
                &self.documents_dir,
            )
            .await;

            let mut s = session.write();
            match result {
                Ok(_) => {
                    s.documents_completed += 1;
                    DOCUMENTS_GENERATED.inc();
                }
                Err(err) => {
                    // failure isolation: record and move on
                    warn!(
                        "document {} failed for application {}: {}",
                        document_type, application_id, err
                    );
                    s.errors
                        .push(format!("{}: {}", document_type.display_name(), err));
                    DOCUMENTS_FAILED.inc();
                }
            }
            // recomputed, capped at 95 until the terminal transition
            s.progress = s
                .progress
                .max(5 + (s.documents_completed * 90 / total) as i32)
                .min(95);
        }

        let mut s = session.write();
        s.status = JobStatus::Completed;
        s.progress = 100;
        s.current_document = None;
        s.completed_at = Some(Utc::now());
        info!(
            "generation job {attempt} for {application_id} completed: {}/{} documents, {} errors",
            s.documents_completed,
            total,
            s.errors.len()
        );
    }

    /// Load the snapshot: answers, auto-filled, plus extracted documents.
    async fn load_context(&self, application_id: Uuid) -> Result<ApplicationContext, GenerationError> {
        let answers = self.data_store.questionnaire_answers(application_id).await?;
        let extractions = self.data_store.extracted_documents(application_id).await?;

        let mut engine = AutoFillEngine::new();
        let (filled, summary) = engine.fill(&answers)?;
        info!(
            "auto-fill for {application_id}: {} fields generated",
            summary.total_generated()
        );

        Ok(ApplicationContext::new(filled, extractions))
    }

    /// Live session snapshot when present, else a coarse status derived from
    /// the durable records of the latest attempt.
    pub async fn get_status(
        &self,
        application_id: Uuid,
    ) -> Result<GenerationStatusResponse, GenerationError> {
        if let Some(session) = self.sessions.get(application_id).await {
            return Ok(snapshot(&session.read()));
        }

        let records = self.document_store.latest_attempt(application_id).await?;
        let total = DocumentType::ALL.len();
        if records.is_empty() {
            return Ok(GenerationStatusResponse {
                status: "not_started".to_string(),
                progress: 0,
                current_document: None,
                documents_completed: 0,
                total_documents: total,
                errors: Vec::new(),
            });
        }

        let completed = records
            .iter()
            .filter(|r| r.status == DocumentStatus::Completed)
            .count();
        let all_terminal = records.iter().all(|r| r.status.is_terminal());
        let errors = records
            .iter()
            .filter_map(|r| {
                r.error
                    .as_ref()
                    .map(|e| format!("{}: {}", r.document_type.display_name(), e))
            })
            .collect();

        Ok(GenerationStatusResponse {
            status: if all_terminal && records.len() == total {
                "completed".to_string()
            } else {
                "generating".to_string()
            },
            progress: if all_terminal && records.len() == total {
                100
            } else {
                (5 + completed * 90 / total).min(95) as i32
            },
            current_document: None,
            documents_completed: completed,
            total_documents: total,
            errors,
        })
    }

    /// Only completed records are listed; failed attempts stay history.
    pub async fn list_generated_documents(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<GeneratedDocumentSummary>, GenerationError> {
        let records = self.document_store.list_completed(application_id).await?;
        Ok(records.iter().map(GeneratedDocumentSummary::from).collect())
    }

    /// Path of one completed document; anything else is not-found.
    pub async fn get_document_file_path(
        &self,
        application_id: Uuid,
        document_id: Uuid,
    ) -> Result<PathBuf, GenerationError> {
        let record = self
            .document_store
            .get(application_id, document_id)
            .await?
            .ok_or(GenerationError::DocumentNotFound)?;

        if record.status != DocumentStatus::Completed {
            return Err(GenerationError::DocumentNotFound);
        }
        Ok(PathBuf::from(record.file_path))
    }
}

fn snapshot(session: &GenerationSession) -> GenerationStatusResponse {
    GenerationStatusResponse {
        status: session.status.as_str().to_string(),
        progress: session.progress,
        current_document: session.current_document.clone(),
        documents_completed: session.documents_completed,
        total_documents: session.total_documents,
        errors: session.errors.clone(),
    }
}
