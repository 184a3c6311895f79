//! National ID translation generator.
//!
//! Fixed-layout government-ID-style page, purely field-driven with static
//! textual fallbacks for anything that arrives empty. No oracle call.

use super::{DocumentGenerator, DocumentLayout, DocumentType, GenerationContext, GeneratorError};
use async_trait::async_trait;

const NOT_AVAILABLE: &str = "Not available on source document";

pub struct IdTranslationGenerator;

#[async_trait]
impl DocumentGenerator for IdTranslationGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::IdTranslation
    }

    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError> {
        let data = &ctx.data;

        let rows = vec![
            (
                "Name".to_string(),
                data.resolve_text_or(
                    &["full_name", "national_id.full_name", "passport_copy.full_name"],
                    NOT_AVAILABLE,
                ),
            ),
            (
                "Father's Name".to_string(),
                data.resolve_text_or(&["father_name", "national_id.father_name"], NOT_AVAILABLE),
            ),
            (
                "Mother's Name".to_string(),
                data.resolve_text_or(&["mother_name", "national_id.mother_name"], NOT_AVAILABLE),
            ),
            (
                "Date of Birth".to_string(),
                data.resolve_text_or(
                    &["date_of_birth", "national_id.date_of_birth", "passport_copy.date_of_birth"],
                    NOT_AVAILABLE,
                ),
            ),
            (
                "Place of Birth".to_string(),
                data.resolve_text_or(&["place_of_birth", "national_id.place_of_birth"], NOT_AVAILABLE),
            ),
            (
                "ID Number".to_string(),
                data.resolve_text_or(&["national_id_number", "national_id.id_number"], NOT_AVAILABLE),
            ),
            (
                "Address".to_string(),
                data.resolve_text_or(&["address", "national_id.address"], NOT_AVAILABLE),
            ),
            (
                "Nationality".to_string(),
                data.resolve_text_or(&["nationality"], "Bangladeshi"),
            ),
        ];

        Ok(DocumentLayout::new("ID Translation")
            .heading("National Identity Card")
            .subheading("Certified English Translation")
            .key_values(rows)
            .spacer()
            .paragraph(
                "This is a true and faithful English translation of the original \
                 national identity card presented by the applicant."
                    .to_string(),
            ))
    }
}
