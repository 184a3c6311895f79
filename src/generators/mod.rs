//! Per-document generators.
//!
//! One generator per embassy document, all sharing the `DocumentGenerator`
//! contract: resolve fields from the application context, optionally consult
//! the text oracle, and compose layout instructions. The shared runner
//! `produce_document` owns the record lifecycle around compose + render, so
//! individual generators never touch persistence.

pub mod asset_valuation;
pub mod common;
pub mod cover_letter;
pub mod engine;
pub mod financial_statement;
pub mod home_ties;
pub mod id_translation;
pub mod layout;
pub mod travel_history;
pub mod travel_itinerary;
pub mod visiting_card;

pub use engine::{PdfRenderer, RenderError, TypstPdfRenderer};
pub use layout::{DocumentLayout, LayoutBlock};

use crate::appdata::{ApplicationContext, StoreError};
use crate::generation::models::{DocumentStore, GeneratedDocumentRecord};
use crate::oracle::TextOracle;
use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// The eight documents of a generation batch, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    CoverLetter,
    IdTranslation,
    VisitingCard,
    FinancialStatement,
    TravelItinerary,
    TravelHistory,
    HomeTies,
    AssetValuation,
}

impl DocumentType {
    /// Fixed generation order.
    pub const ALL: [DocumentType; 8] = [
        DocumentType::CoverLetter,
        DocumentType::IdTranslation,
        DocumentType::VisitingCard,
        DocumentType::FinancialStatement,
        DocumentType::TravelItinerary,
        DocumentType::TravelHistory,
        DocumentType::HomeTies,
        DocumentType::AssetValuation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::CoverLetter => "cover_letter",
            DocumentType::IdTranslation => "id_translation",
            DocumentType::VisitingCard => "visiting_card",
            DocumentType::FinancialStatement => "financial_statement",
            DocumentType::TravelItinerary => "travel_itinerary",
            DocumentType::TravelHistory => "travel_history",
            DocumentType::HomeTies => "home_ties",
            DocumentType::AssetValuation => "asset_valuation",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|dt| dt.as_str() == raw)
    }

    /// Human-readable name used in progress reporting and error lists.
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::CoverLetter => "Cover Letter",
            DocumentType::IdTranslation => "ID Translation",
            DocumentType::VisitingCard => "Visiting Card",
            DocumentType::FinancialStatement => "Financial Statement",
            DocumentType::TravelItinerary => "Travel Itinerary",
            DocumentType::TravelHistory => "Travel History",
            DocumentType::HomeTies => "Home Ties Statement",
            DocumentType::AssetValuation => "Asset Valuation",
        }
    }

    /// Stem used for output file names.
    pub fn file_stem(&self) -> &'static str {
        match self {
            DocumentType::CoverLetter => "cover-letter",
            DocumentType::IdTranslation => "id-translation",
            DocumentType::VisitingCard => "visiting-card",
            DocumentType::FinancialStatement => "financial-statement",
            DocumentType::TravelItinerary => "travel-itinerary",
            DocumentType::TravelHistory => "travel-history",
            DocumentType::HomeTies => "home-ties-statement",
            DocumentType::AssetValuation => "asset-valuation",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors a single document generation can produce. Oracle trouble is NOT
/// represented here; generators degrade to fallback content instead.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("document store failure: {0}")]
    Store(#[from] StoreError),
    #[error("asset value `{0}` is not numeric")]
    InvalidAmount(String),
}

/// Everything a generator may read while composing: the resolved application
/// snapshot and the (untrusted) text oracle.
pub struct GenerationContext {
    pub application_id: Uuid,
    pub data: ApplicationContext,
    pub oracle: Arc<dyn TextOracle>,
}

/// Contract shared by all eight generators.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    fn document_type(&self) -> DocumentType;

    /// Resolve fields, optionally consult the oracle, and compose the layout.
    /// Must not perform I/O beyond the oracle call.
    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError>;
}

/// The batch in its fixed order.
pub fn all_generators() -> Vec<Box<dyn DocumentGenerator>> {
    vec![
        Box::new(cover_letter::CoverLetterGenerator),
        Box::new(id_translation::IdTranslationGenerator),
        Box::new(visiting_card::VisitingCardGenerator),
        Box::new(financial_statement::FinancialStatementGenerator),
        Box::new(travel_itinerary::TravelItineraryGenerator),
        Box::new(travel_history::TravelHistoryGenerator),
        Box::new(home_ties::HomeTiesGenerator),
        Box::new(asset_valuation::AssetValuationGenerator),
    ]
}

/// Run one generator through the full record lifecycle.
///
/// Creates the per-document record in `generating`, composes and renders,
/// then marks it `completed` with the final size. On any error the record is
/// marked `failed` with the message and the error propagates to the
/// orchestrator, which isolates it from the rest of the batch.
pub async fn produce_document(
    generator: &dyn DocumentGenerator,
    ctx: &GenerationContext,
    attempt: Uuid,
    store: &Arc<dyn DocumentStore>,
    renderer: &Arc<dyn PdfRenderer>,
    documents_dir: &Path,
) -> Result<GeneratedDocumentRecord, GeneratorError> {
    let document_type = generator.document_type();
    let applicant = ctx.data.resolve_text_or(&["full_name"], "applicant");
    let file_name = common::output_filename(document_type.file_stem(), &applicant);
    let file_path = documents_dir
        .join(ctx.application_id.to_string())
        .join(&file_name);

    let mut record = GeneratedDocumentRecord::new(
        ctx.application_id,
        attempt,
        document_type,
        file_name,
        file_path.to_string_lossy().to_string(),
    );
    store.insert(&record).await?;

    let outcome = async {
        let layout = generator.compose(ctx).await?;
        let size = renderer.render(&layout, &file_path).await?;
        Ok::<u64, GeneratorError>(size)
    }
    .await;

    match outcome {
        Ok(size) => {
            record.mark_completed(size as i64);
            store.update(&record).await?;
            info!(
                "generated {} for application {} ({} bytes)",
                document_type, ctx.application_id, size
            );
            Ok(record)
        }
        Err(err) => {
            record.mark_failed(err.to_string());
            if let Err(store_err) = store.update(&record).await {
                error!(
                    "could not record failure of {} for application {}: {}",
                    document_type, ctx.application_id, store_err
                );
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_order_is_fixed() {
        let order: Vec<DocumentType> = all_generators()
            .iter()
            .map(|g| g.document_type())
            .collect();
        assert_eq!(order, DocumentType::ALL.to_vec());
    }

    #[test]
    fn document_type_round_trips_through_text() {
        for dt in DocumentType::ALL {
            assert_eq!(DocumentType::parse(dt.as_str()), Some(dt));
        }
        assert_eq!(DocumentType::parse("unknown"), None);
    }
}
