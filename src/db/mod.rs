//! Application state and store wiring.
//!
//! `AppState` owns the orchestrator and everything behind it. Production
//! wiring connects Postgres, the HTTP oracle, and the Typst renderer; tests
//! and demo mode swap in memory-backed parts through `new_with_parts`.

pub mod appdata;
pub mod documents;

pub use appdata::{InMemoryApplicationDataStore, PgApplicationDataStore};
pub use documents::{InMemoryDocumentStore, PgDocumentStore};

use crate::appdata::ApplicationDataStore;
use crate::generation::models::DocumentStore;
use crate::generation::GenerationOrchestrator;
use crate::generators::{PdfRenderer, TypstPdfRenderer};
use crate::oracle::{HttpTextOracle, OracleConfig, StaticFallbackOracle, TextOracle};
use anyhow::Context;
use log::warn;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<GenerationOrchestrator>,
}

impl AppState {
    /// Production wiring from the environment: `DATABASE_URL`,
    /// `DOCUMENTS_DIR`, and the `ORACLE_*` variables.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .connect(&database_url)
            .await
            .context("could not connect to database")?;

        let documents_dir =
            PathBuf::from(env::var("DOCUMENTS_DIR").unwrap_or_else(|_| "./documents".to_string()));

        let oracle: Arc<dyn TextOracle> = match OracleConfig::from_env() {
            Some(config) => {
                let http_client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(120))
                    .user_agent("visaprep-server/1.0")
                    .build()
                    .context("could not build http client")?;
                Arc::new(HttpTextOracle::new(config, http_client))
            }
            None => {
                warn!("ORACLE_API_KEY not set; documents will use static fallback content");
                Arc::new(StaticFallbackOracle)
            }
        };

        let data_store: Arc<dyn ApplicationDataStore> =
            Arc::new(PgApplicationDataStore::new(pool.clone()));
        let document_store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool));

        Ok(Self::new_with_parts(
            data_store,
            document_store,
            oracle,
            Arc::new(TypstPdfRenderer),
            documents_dir,
        ))
    }

    /// Assemble state from explicit parts; tests and demo mode use this with
    /// in-memory stores and mock collaborators.
    pub fn new_with_parts(
        data_store: Arc<dyn ApplicationDataStore>,
        document_store: Arc<dyn DocumentStore>,
        oracle: Arc<dyn TextOracle>,
        renderer: Arc<dyn PdfRenderer>,
        documents_dir: PathBuf,
    ) -> Self {
        Self {
            orchestrator: Arc::new(GenerationOrchestrator::new(
                data_store,
                document_store,
                oracle,
                renderer,
                documents_dir,
            )),
        }
    }
}
