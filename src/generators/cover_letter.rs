//! Cover letter generator.
//!
//! The single most important document of the batch. The oracle prompt carries
//! a one-shot exemplar letter to anchor tone and asks for a structured JSON
//! response so the layout is deterministic. When the oracle fails or returns
//! prose, the raw text becomes the letter body; when it returns nothing
//! usable at all, a field-driven template letter is composed instead.

use super::{DocumentGenerator, DocumentLayout, DocumentType, GenerationContext, GeneratorError};
use crate::oracle::{parse_structured, strip_code_fences, OracleError};
use async_trait::async_trait;
use log::warn;
use serde::Deserialize;

pub struct CoverLetterGenerator;

#[derive(Debug, Deserialize)]
struct LetterResponse {
    subject: String,
    greeting: String,
    paragraphs: Vec<String>,
    closing: String,
    signature: String,
}

const EXEMPLAR: &str = r#"{
  "subject": "Application for a Tourist Visa",
  "greeting": "Dear Sir or Madam,",
  "paragraphs": [
    "I am writing to apply for a tourist visa to visit Italy from 10 June to 24 June.",
    "I am employed as an accountant at Prime Distribution Ltd., where I have worked for six years. My employer has approved my leave for the travel period.",
    "I will bear all expenses of the trip myself, as shown in the attached bank statements, and I will return before my leave ends because my family and my employment are in Bangladesh."
  ],
  "closing": "Thank you for considering my application.",
  "signature": "Mohammad Rahim"
}"#;

impl CoverLetterGenerator {
    fn build_prompt(ctx: &GenerationContext) -> String {
        let name = ctx.data.resolve_text_or(&["full_name", "passport_copy.full_name"], "the applicant");
        let destination = ctx.data.resolve_text_or(&["destination_country"], "the destination country");
        let purpose = ctx.data.resolve_text_or(&["travel_purpose"], "tourism");
        let departure = ctx.data.resolve_text_or(&["departure_date"], "the planned date");
        let duration = ctx.data.resolve_text_or(&["duration_days"], "14");
        let occupation = ctx.data.resolve_text_or(&["occupation", "employment_letter.designation"], "a professional");
        let employer = ctx.data.resolve_text_or(&["employer_name", "employment_letter.company_name"], "my employer");
        let ties = ctx.data.resolve_text(&["reasons_to_return"]);

        format!(
            "Write a formal visa application cover letter for {name}, applying to visit \
             {destination} for {purpose}, departing {departure} for {duration} days. \
             The applicant works as {occupation} at {employer}. \
             Ties to home country: {ties}\n\n\
             Respond with ONLY a JSON object shaped exactly like this example:\n{EXEMPLAR}"
        )
    }

    /// Field-driven letter used when the oracle gives us nothing at all.
    fn template_letter(ctx: &GenerationContext) -> LetterResponse {
        let name = ctx.data.resolve_text_or(&["full_name", "passport_copy.full_name"], "The Applicant");
        let destination = ctx.data.resolve_text_or(&["destination_country"], "your country");
        let purpose = ctx.data
            .resolve_text_or(&["travel_purpose"], "tourism")
            .to_lowercase();
        let departure = ctx.data.resolve_text_or(&["departure_date"], "the planned date");
        let duration = ctx.data.resolve_text_or(&["duration_days"], "a short period");
        let occupation = ctx.data.resolve_text_or(&["occupation"], "a professional");
        let employer = ctx.data.resolve_text_or(&["employer_name"], "my employer");
        let ties = ctx.data.resolve_text_or(
            &["reasons_to_return"],
            "I maintain strong family and professional ties to my home country.",
        );

        LetterResponse {
            subject: format!("Application for a visa to visit {destination}"),
            greeting: "Dear Sir or Madam,".to_string(),
            paragraphs: vec![
                format!(
                    "I am writing to apply for a visa to visit {destination} for {purpose}, \
                     departing on {departure} for {duration} days."
                ),
                format!(
                    "I am employed as {occupation} at {employer}, and I will personally bear \
                     all expenses of this trip, as the attached financial documents show."
                ),
                ties,
            ],
            closing: "Thank you for considering my application.".to_string(),
            signature: name,
        }
    }

    fn letter_from_oracle(ctx: &GenerationContext, raw: &str) -> LetterResponse {
        if let Some(letter) = parse_structured::<LetterResponse>(raw) {
            if !letter.paragraphs.is_empty() {
                return letter;
            }
        }

        // unstructured prose still beats a template: use it as the body
        let mut fallback = Self::template_letter(ctx);
        let body = strip_code_fences(raw);
        if !body.trim().is_empty() {
            fallback.paragraphs = body
                .split("\n\n")
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }
        fallback
    }
}

#[async_trait]
impl DocumentGenerator for CoverLetterGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::CoverLetter
    }

    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError> {
        let prompt = Self::build_prompt(ctx);
        let letter = match ctx.oracle.generate_text(&prompt).await {
            Ok(raw) => Self::letter_from_oracle(ctx, &raw),
            Err(OracleError::NotConfigured) => Self::template_letter(ctx),
            Err(err) => {
                warn!("cover letter oracle call failed, using template: {err}");
                Self::template_letter(ctx)
            }
        };

        let mut layout = DocumentLayout::new("Cover Letter")
            .heading("Visa Application Cover Letter")
            .paragraph(format!("Subject: {}", letter.subject))
            .spacer()
            .paragraph(letter.greeting);

        for paragraph in letter.paragraphs {
            layout = layout.paragraph(paragraph);
        }

        layout = layout
            .paragraph(letter.closing)
            .signature(letter.signature, "Applicant");

        Ok(layout)
    }
}
