//! Generated-document record stores.
//!
//! One row per (application, document type, attempt); retries insert fresh
//! rows, so history is preserved. Postgres in production, in-memory for
//! tests and demo mode.

use crate::appdata::StoreError;
use crate::generation::models::{DocumentStatus, DocumentStore, GeneratedDocumentRecord};
use crate::generators::DocumentType;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn backend_err(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<GeneratedDocumentRecord, StoreError> {
    let document_type: String = row.try_get("document_type").map_err(backend_err)?;
    let status: String = row.try_get("status").map_err(backend_err)?;

    Ok(GeneratedDocumentRecord {
        id: row.try_get("id").map_err(backend_err)?,
        application_id: row.try_get("application_id").map_err(backend_err)?,
        document_type: DocumentType::parse(&document_type)
            .ok_or_else(|| StoreError::Backend(format!("unknown document type {document_type}")))?,
        attempt: row.try_get("attempt").map_err(backend_err)?,
        file_name: row.try_get("file_name").map_err(backend_err)?,
        file_path: row.try_get("file_path").map_err(backend_err)?,
        file_size: row.try_get("file_size").map_err(backend_err)?,
        status: DocumentStatus::parse(&status)
            .ok_or_else(|| StoreError::Backend(format!("unknown status {status}")))?,
        progress: row.try_get("progress").map_err(backend_err)?,
        error: row.try_get("error").map_err(backend_err)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(backend_err)?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(backend_err)?,
    })
}

const RECORD_COLUMNS: &str = "id, application_id, document_type, attempt, file_name, file_path, \
                              file_size, status, progress, error, created_at, updated_at";

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, record: &GeneratedDocumentRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO generated_documents \
             (id, application_id, document_type, attempt, file_name, file_path, \
              file_size, status, progress, error, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(record.id)
        .bind(record.application_id)
        .bind(record.document_type.as_str())
        .bind(record.attempt)
        .bind(&record.file_name)
        .bind(&record.file_path)
        .bind(record.file_size)
        .bind(record.status.as_str())
        .bind(record.progress)
        .bind(record.error.as_deref())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend_err)?;
        Ok(())
    }

    async fn update(&self, record: &GeneratedDocumentRecord) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE generated_documents \
             SET file_size = $2, status = $3, progress = $4, error = $5, updated_at = $6 \
             WHERE id = $1",
        )
        .bind(record.id)
        .bind(record.file_size)
        .bind(record.status.as_str())
        .bind(record.progress)
        .bind(record.error.as_deref())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend_err)?;
        Ok(())
    }

    async fn list_completed(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<GeneratedDocumentRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM generated_documents \
             WHERE application_id = $1 AND status = 'completed' \
             ORDER BY created_at DESC"
        ))
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend_err)?;

        rows.iter().map(record_from_row).collect()
    }

    async fn get(
        &self,
        application_id: Uuid,
        document_id: Uuid,
    ) -> Result<Option<GeneratedDocumentRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM generated_documents \
             WHERE application_id = $1 AND id = $2"
        ))
        .bind(application_id)
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_err)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn latest_attempt(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<GeneratedDocumentRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM generated_documents \
             WHERE application_id = $1 AND attempt = ( \
                 SELECT attempt FROM generated_documents \
                 WHERE application_id = $1 \
                 ORDER BY created_at DESC LIMIT 1) \
             ORDER BY created_at ASC"
        ))
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend_err)?;

        rows.iter().map(record_from_row).collect()
    }
}

/// In-memory store used by tests and demo mode.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<Vec<GeneratedDocumentRecord>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record ever written, for test assertions.
    pub fn all_records(&self) -> Vec<GeneratedDocumentRecord> {
        self.records.read().clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, record: &GeneratedDocumentRecord) -> Result<(), StoreError> {
        self.records.write().push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &GeneratedDocumentRecord) -> Result<(), StoreError> {
        let mut records = self.records.write();
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn list_completed(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<GeneratedDocumentRecord>, StoreError> {
        let mut completed: Vec<GeneratedDocumentRecord> = self
            .records
            .read()
            .iter()
            .filter(|r| r.application_id == application_id && r.status == DocumentStatus::Completed)
            .cloned()
            .collect();
        completed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(completed)
    }

    async fn get(
        &self,
        application_id: Uuid,
        document_id: Uuid,
    ) -> Result<Option<GeneratedDocumentRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|r| r.application_id == application_id && r.id == document_id)
            .cloned())
    }

    async fn latest_attempt(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<GeneratedDocumentRecord>, StoreError> {
        let records = self.records.read();
        let latest = records
            .iter()
            .filter(|r| r.application_id == application_id)
            .max_by_key(|r| r.created_at)
            .map(|r| r.attempt);

        Ok(match latest {
            Some(attempt) => records
                .iter()
                .filter(|r| r.application_id == application_id && r.attempt == attempt)
                .cloned()
                .collect(),
            None => Vec::new(),
        })
    }
}
