//! Application data store implementations.
//!
//! Postgres for production (JSONB payloads, runtime-checked queries) and an
//! in-memory variant for tests and demo mode.

use crate::appdata::{ApplicationDataStore, DataBag, ExtractedDocument, FieldValue, StoreError};
use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::{PgPool, Row};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

fn backend_err(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn bag_from_json(value: &serde_json::Value) -> DataBag {
    match value {
        serde_json::Value::Object(entries) => entries
            .iter()
            .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
            .collect(),
        _ => DataBag::new(),
    }
}

pub struct PgApplicationDataStore {
    pool: PgPool,
}

impl PgApplicationDataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationDataStore for PgApplicationDataStore {
    async fn questionnaire_answers(&self, application_id: Uuid) -> Result<DataBag, StoreError> {
        let row = sqlx::query(
            "SELECT answers FROM questionnaire_responses WHERE application_id = $1",
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_err)?;

        match row {
            Some(row) => {
                let answers: serde_json::Value = row.try_get("answers").map_err(backend_err)?;
                Ok(bag_from_json(&answers))
            }
            None => Ok(DataBag::new()),
        }
    }

    async fn extracted_documents(
        &self,
        application_id: Uuid,
    ) -> Result<BTreeMap<String, ExtractedDocument>, StoreError> {
        let rows = sqlx::query(
            "SELECT document_type, fields, confidence, error \
             FROM extracted_documents WHERE application_id = $1",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend_err)?;

        let mut documents = BTreeMap::new();
        for row in rows {
            let document_type: String = row.try_get("document_type").map_err(backend_err)?;
            let fields: serde_json::Value = row.try_get("fields").map_err(backend_err)?;
            let confidence: i32 = row.try_get("confidence").map_err(backend_err)?;
            let error: Option<String> = row.try_get("error").map_err(backend_err)?;

            documents.insert(
                document_type,
                ExtractedDocument {
                    fields: bag_from_json(&fields),
                    confidence,
                    error,
                },
            );
        }
        Ok(documents)
    }
}

/// In-memory store used by tests and demo mode.
#[derive(Default)]
pub struct InMemoryApplicationDataStore {
    answers: RwLock<HashMap<Uuid, DataBag>>,
    extractions: RwLock<HashMap<Uuid, BTreeMap<String, ExtractedDocument>>>,
}

impl InMemoryApplicationDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_answers(&self, application_id: Uuid, answers: DataBag) {
        self.answers.write().insert(application_id, answers);
    }

    pub fn put_extractions(
        &self,
        application_id: Uuid,
        extractions: BTreeMap<String, ExtractedDocument>,
    ) {
        self.extractions.write().insert(application_id, extractions);
    }
}

#[async_trait]
impl ApplicationDataStore for InMemoryApplicationDataStore {
    async fn questionnaire_answers(&self, application_id: Uuid) -> Result<DataBag, StoreError> {
        Ok(self
            .answers
            .read()
            .get(&application_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn extracted_documents(
        &self,
        application_id: Uuid,
    ) -> Result<BTreeMap<String, ExtractedDocument>, StoreError> {
        Ok(self
            .extractions
            .read()
            .get(&application_id)
            .cloned()
            .unwrap_or_default())
    }
}
