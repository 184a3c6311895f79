//! In-memory generation sessions.
//!
//! The fast-poll half of generation state. Sessions live in a TTL-bounded
//! cache keyed by application id, so the map cannot grow without bound over
//! the life of the process. Sessions are not persisted: a restart loses
//! in-flight progress and status queries fall back to the durable records.

use chrono::{DateTime, Utc};
use moka::future::Cache;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const SESSION_CAPACITY: u64 = 10_000;

/// Job-level status of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Started,
    Generating,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Started => "started",
            JobStatus::Generating => "generating",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, JobStatus::Started | JobStatus::Generating)
    }
}

/// Ephemeral per-application job state, mutated only by the orchestrator.
#[derive(Debug, Clone)]
pub struct GenerationSession {
    pub application_id: Uuid,
    pub attempt: Uuid,
    pub status: JobStatus,
    /// Overall progress 0-100, monotonically non-decreasing.
    pub progress: i32,
    pub current_document: Option<String>,
    pub documents_completed: usize,
    pub total_documents: usize,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GenerationSession {
    fn new(application_id: Uuid, attempt: Uuid, total_documents: usize) -> Self {
        Self {
            application_id,
            attempt,
            status: JobStatus::Started,
            progress: 5,
            current_document: None,
            documents_completed: 0,
            total_documents,
            errors: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }
}

pub type SharedSession = Arc<RwLock<GenerationSession>>;

/// Error returned when a second start races a live job.
#[derive(Debug, thiserror::Error)]
#[error("generation already in progress for this application")]
pub struct AlreadyRunning;

/// Keyed cache of live sessions with a guarded check-and-insert for the
/// mutual-exclusion path.
pub struct SessionStore {
    cache: Cache<Uuid, SharedSession>,
    start_guard: Mutex<()>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(SESSION_TTL)
                .max_capacity(SESSION_CAPACITY)
                .build(),
            start_guard: Mutex::new(()),
        }
    }

    /// Install a fresh session for a new job, rejecting when one is live.
    /// A terminal session for the same application is replaced.
    pub async fn begin(
        &self,
        application_id: Uuid,
        attempt: Uuid,
        total_documents: usize,
    ) -> Result<SharedSession, AlreadyRunning> {
        let _guard = self.start_guard.lock().await;

        if let Some(existing) = self.cache.get(&application_id).await {
            if existing.read().status.is_live() {
                return Err(AlreadyRunning);
            }
        }

        let session = Arc::new(RwLock::new(GenerationSession::new(
            application_id,
            attempt,
            total_documents,
        )));
        self.cache.insert(application_id, session.clone()).await;
        Ok(session)
    }

    pub async fn get(&self, application_id: Uuid) -> Option<SharedSession> {
        self.cache.get(&application_id).await
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
