//! Visiting card generator.
//!
//! Fixed business-card layout centered on the page, purely field-driven.
//! Long values are truncated rather than allowed to overflow the card.

use super::common::truncate_for_layout;
use super::{DocumentGenerator, DocumentLayout, DocumentType, GenerationContext, GeneratorError};
use async_trait::async_trait;

// card is narrow; anything longer wraps badly
const MAX_LINE: usize = 40;

pub struct VisitingCardGenerator;

#[async_trait]
impl DocumentGenerator for VisitingCardGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::VisitingCard
    }

    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError> {
        let data = &ctx.data;

        let name = data.resolve_text_or(&["full_name", "passport_copy.full_name"], "Applicant");
        let title = data.resolve_text_or(&["job_title", "occupation"], "Professional");
        let company = data.resolve_text(&["employer_name", "business_name"]);
        let phone = data.resolve_text(&["phone"]);
        let email = data.resolve_text(&["email"]);
        let address = data.resolve_text(&["company_address", "address"]);

        let mut lines = vec![
            truncate_for_layout(&name, MAX_LINE),
            truncate_for_layout(&title, MAX_LINE),
        ];
        for optional in [company, address, phone, email] {
            if !optional.is_empty() {
                lines.push(truncate_for_layout(&optional, MAX_LINE));
            }
        }

        Ok(DocumentLayout::new("Visiting Card").card(lines))
    }
}
