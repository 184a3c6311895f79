//! Home ties statement generator.
//!
//! Short oracle-generated narrative, hard-capped at roughly 250 words over
//! three paragraphs. The prompt forbids markup, but the oracle is not a
//! compliant renderer, so leaked markup characters are stripped from the
//! output before layout.

use super::{DocumentGenerator, DocumentLayout, DocumentType, GenerationContext, GeneratorError};
use crate::oracle::{cap_words, strip_code_fences, strip_markup};
use async_trait::async_trait;
use log::warn;

const MAX_WORDS: usize = 250;

pub struct HomeTiesGenerator;

impl HomeTiesGenerator {
    fn build_prompt(ctx: &GenerationContext) -> String {
        let name = ctx.data.resolve_text_or(&["full_name"], "the applicant");
        let reasons = ctx.data.resolve_text_or(
            &["reasons_to_return"],
            "family, employment, and property ties to the home country",
        );
        let occupation = ctx.data.resolve_text_or(&["occupation"], "a professional");
        let employer = ctx.data.resolve_text_or(&["employer_name"], "their employer");

        format!(
            "Write a first-person statement for {name}, who works as {occupation} at {employer}, \
             explaining their ties to their home country and why they will return after the trip. \
             Base it on: {reasons}. \
             Exactly 3 short paragraphs, at most 250 words in total. \
             Plain prose only: no headings, no lists, no markdown or other markup of any kind."
        )
    }

    fn fallback_statement(ctx: &GenerationContext) -> String {
        let reasons = ctx.data.resolve_text_or(
            &["reasons_to_return"],
            "I have strong family, professional, and social ties to my home country.",
        );
        format!(
            "{reasons}\n\nFor these reasons I will return home before the end of the permitted \
             stay, as I have on every previous occasion."
        )
    }
}

#[async_trait]
impl DocumentGenerator for HomeTiesGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::HomeTies
    }

    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError> {
        let narrative = match ctx.oracle.generate_text(&Self::build_prompt(ctx)).await {
            Ok(raw) => {
                let cleaned = strip_markup(strip_code_fences(&raw));
                if cleaned.trim().is_empty() {
                    warn!("home ties oracle returned empty prose, using fallback statement");
                    Self::fallback_statement(ctx)
                } else {
                    cap_words(&cleaned, MAX_WORDS)
                }
            }
            Err(err) => {
                warn!("home ties oracle call failed, using fallback statement: {err}");
                Self::fallback_statement(ctx)
            }
        };

        let name = ctx.data.resolve_text_or(&["full_name"], "Applicant");

        let mut layout =
            DocumentLayout::new("Home Ties Statement").heading("Statement of Ties to Home Country");
        for paragraph in narrative.split("\n\n").filter(|p| !p.trim().is_empty()) {
            layout = layout.paragraph(paragraph.trim().to_string());
        }
        Ok(layout.signature(name, "Applicant"))
    }
}
