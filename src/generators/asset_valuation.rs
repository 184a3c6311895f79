//! Asset valuation generator.
//!
//! Aggregates property, vehicle, and other asset rows into one table with a
//! computed total. Each value's numeric portion is parsed (thousands
//! separators and currency labels stripped) and summed; a row whose value is
//! present but wholly non-numeric is a real data fault and fails this one
//! document. With no asset rows at all, a single "as per documents"
//! placeholder row is emitted instead of an empty table.

use super::common::format_amount;
use super::{DocumentGenerator, DocumentLayout, DocumentType, GenerationContext, GeneratorError};
use crate::appdata::FieldValue;
use async_trait::async_trait;

pub struct AssetValuationGenerator;

struct AssetRow {
    kind: String,
    description: String,
    value: f64,
}

impl AssetValuationGenerator {
    /// Collect asset rows from the structured collection, falling back to the
    /// scalar property/vehicle fields when no collection exists.
    fn collect_rows(ctx: &GenerationContext) -> Result<Vec<AssetRow>, GeneratorError> {
        let data = &ctx.data;
        let mut rows = Vec::new();

        if let Some(entries) = data.resolve(&["assets"]).as_list() {
            for entry in entries {
                let value_field = entry.get("value");
                if value_field.is_empty() {
                    continue;
                }
                let value = value_field
                    .as_amount()
                    .ok_or_else(|| GeneratorError::InvalidAmount(value_field.as_text()))?;
                rows.push(AssetRow {
                    kind: non_empty_or(entry.get("asset_type"), "Asset"),
                    description: non_empty_or(entry.get("description"), "As per documents"),
                    value,
                });
            }
        }

        if rows.is_empty() {
            for (kind, value_keys, description_keys) in [
                ("Property", ["property_value"], ["property_description"]),
                ("Vehicle", ["vehicle_value"], ["vehicle_description"]),
            ] {
                let value_field = data.resolve(&value_keys);
                if value_field.is_empty() {
                    continue;
                }
                let value = value_field
                    .as_amount()
                    .ok_or_else(|| GeneratorError::InvalidAmount(value_field.as_text()))?;
                rows.push(AssetRow {
                    kind: kind.to_string(),
                    description: data.resolve_text_or(&description_keys, "As per documents"),
                    value,
                });
            }
        }

        Ok(rows)
    }
}

fn non_empty_or(value: FieldValue, fallback: &str) -> String {
    let text = value.as_text();
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[async_trait]
impl DocumentGenerator for AssetValuationGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::AssetValuation
    }

    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError> {
        let data = &ctx.data;
        let name = data.resolve_text_or(&["full_name", "passport_copy.full_name"], "Applicant");

        let rows = Self::collect_rows(ctx)?;
        let total: f64 = rows.iter().map(|row| row.value).sum();

        let table_rows: Vec<Vec<String>> = if rows.is_empty() {
            vec![vec![
                "Assets".to_string(),
                "As per supporting documents".to_string(),
                "As per documents".to_string(),
            ]]
        } else {
            rows.iter()
                .map(|row| {
                    vec![
                        row.kind.clone(),
                        row.description.clone(),
                        format_amount(row.value),
                    ]
                })
                .collect()
        };

        let mut layout = DocumentLayout::new("Asset Valuation")
            .heading("Statement of Assets")
            .key_values(vec![("Owner".to_string(), name)])
            .spacer()
            .table(
                vec![
                    "Asset".to_string(),
                    "Description".to_string(),
                    "Estimated Value (BDT)".to_string(),
                ],
                table_rows,
            );

        if !rows.is_empty() {
            layout = layout.key_values(vec![(
                "Total estimated value (BDT)".to_string(),
                format_amount(total),
            )]);
        }

        Ok(layout)
    }
}
