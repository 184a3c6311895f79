//! Travel history generator.
//!
//! Tabular listing of prior international travel. When the resolved data has
//! no prior-travel collection, a single placeholder row states that fact
//! rather than leaving an empty table.

use super::{DocumentGenerator, DocumentLayout, DocumentType, GenerationContext, GeneratorError};
use async_trait::async_trait;

pub struct TravelHistoryGenerator;

#[async_trait]
impl DocumentGenerator for TravelHistoryGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::TravelHistory
    }

    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError> {
        let data = &ctx.data;
        let name = data.resolve_text_or(&["full_name", "passport_copy.full_name"], "Applicant");
        let passport = data.resolve_text_or(
            &["passport_number", "passport_copy.passport_number"],
            "As per passport",
        );

        let trips = data.resolve(&["previous_travel"]);
        let rows: Vec<Vec<String>> = trips
            .as_list()
            .map(|entries| {
                entries
                    .iter()
                    .map(|trip| {
                        vec![
                            trip.get("country").as_text(),
                            trip.get("year").as_text(),
                            trip.get("purpose").as_text(),
                            trip.get("duration_days").as_text(),
                        ]
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rows = if rows.is_empty() {
            vec![vec![
                "No prior international travel".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]]
        } else {
            rows
        };

        Ok(DocumentLayout::new("Travel History")
            .heading("International Travel History")
            .key_values(vec![
                ("Applicant".to_string(), name),
                ("Passport No.".to_string(), passport),
            ])
            .spacer()
            .table(
                vec![
                    "Country".to_string(),
                    "Year".to_string(),
                    "Purpose".to_string(),
                    "Duration (days)".to_string(),
                ],
                rows,
            ))
    }
}
