//! Generation records and API payloads.

use crate::appdata::StoreError;
use crate::generators::DocumentType;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of one per-document generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Generating,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Generating => "generating",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(DocumentStatus::Pending),
            "generating" => Some(DocumentStatus::Generating),
            "completed" => Some(DocumentStatus::Completed),
            "failed" => Some(DocumentStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed)
    }
}

/// Durable record of one (application, document type) generation attempt.
///
/// Created when the attempt starts, mutated in place while it runs, and never
/// deleted; a retry supersedes it with a fresh record, leaving history.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeneratedDocumentRecord {
    pub id: Uuid,
    pub application_id: Uuid,
    pub document_type: DocumentType,
    /// Which generation run this record belongs to.
    pub attempt: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub status: DocumentStatus,
    /// 0-100 for this one document.
    pub progress: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GeneratedDocumentRecord {
    pub fn new(
        application_id: Uuid,
        attempt: Uuid,
        document_type: DocumentType,
        file_name: String,
        file_path: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            application_id,
            document_type,
            attempt,
            file_name,
            file_path,
            file_size: 0,
            status: DocumentStatus::Generating,
            progress: 0,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_completed(&mut self, file_size: i64) {
        self.status = DocumentStatus::Completed;
        self.progress = 100;
        self.file_size = file_size;
        self.error = None;
        self.updated_at = Utc::now();
    }

    pub fn mark_failed(&mut self, message: String) {
        self.status = DocumentStatus::Failed;
        self.error = Some(message);
        self.updated_at = Utc::now();
    }
}

/// Durable half of generation state. Postgres in production, in-memory maps
/// in tests and demo mode.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, record: &GeneratedDocumentRecord) -> Result<(), StoreError>;

    async fn update(&self, record: &GeneratedDocumentRecord) -> Result<(), StoreError>;

    /// Completed records for one application, newest first.
    async fn list_completed(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<GeneratedDocumentRecord>, StoreError>;

    /// One record by id, scoped to the application.
    async fn get(
        &self,
        application_id: Uuid,
        document_id: Uuid,
    ) -> Result<Option<GeneratedDocumentRecord>, StoreError>;

    /// All records of the most recent attempt for one application.
    async fn latest_attempt(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<GeneratedDocumentRecord>, StoreError>;
}

// ---------------------------------------------------------------------------
// API payloads
// ---------------------------------------------------------------------------

/// Pollable job snapshot returned by the status endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerationStatusResponse {
    #[schema(example = "generating")]
    pub status: String,
    #[schema(example = 45)]
    pub progress: i32,
    #[schema(example = "Financial Statement")]
    pub current_document: Option<String>,
    pub documents_completed: usize,
    #[schema(example = 8)]
    pub total_documents: usize,
    pub errors: Vec<String>,
}

/// One completed document in the listing endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeneratedDocumentSummary {
    pub id: Uuid,
    pub document_type: DocumentType,
    #[schema(example = "cover-letter-jane-doe.pdf")]
    pub file_name: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&GeneratedDocumentRecord> for GeneratedDocumentSummary {
    fn from(record: &GeneratedDocumentRecord) -> Self {
        Self {
            id: record.id,
            document_type: record.document_type,
            file_name: record.file_name.clone(),
            file_size: record.file_size,
            created_at: record.created_at,
        }
    }
}
