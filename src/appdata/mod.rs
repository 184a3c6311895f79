//! Application data layer.
//!
//! Everything a generation job knows about one application lives here: the
//! questionnaire answers, the AI-extracted document fields, and the resolver
//! that arbitrates between them. The context is loaded once per job and is
//! read-only afterwards.

pub mod resolver;
pub mod value;

pub use resolver::ApplicationContext;
pub use value::FieldValue;

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Flat key → value bag, the shape both stores speak.
pub type DataBag = BTreeMap<String, FieldValue>;

/// AI-extraction result for one uploaded source document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub fields: DataBag,
    /// Extraction confidence 0-100 as reported by the upstream extractor.
    pub confidence: i32,
    /// Set when extraction itself failed; such documents contribute no fields.
    pub error: Option<String>,
}

impl ExtractedDocument {
    /// Whether this extraction is usable as a resolution source.
    pub fn is_usable(&self) -> bool {
        self.error.is_none()
    }
}

/// Errors from the backing stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("record not found")]
    NotFound,
}

/// Read access to the two external data sources a generation job needs.
///
/// Implemented against Postgres in production and against in-memory maps in
/// tests and demo mode.
#[async_trait]
pub trait ApplicationDataStore: Send + Sync {
    /// Questionnaire answers for one application, keyed by question key.
    async fn questionnaire_answers(&self, application_id: Uuid) -> Result<DataBag, StoreError>;

    /// AI-extraction results keyed by source document type
    /// (e.g. `passport_copy`, `bank_certificate`).
    async fn extracted_documents(
        &self,
        application_id: Uuid,
    ) -> Result<BTreeMap<String, ExtractedDocument>, StoreError>;
}
