//! Priority-ordered field resolution.
//!
//! A generator never reads a store directly; it asks the context to resolve an
//! ordered list of candidate keys. User-confirmed questionnaire answers always
//! outrank AI-extracted values, and the first non-empty hit wins.

use super::value::FieldValue;
use super::{DataBag, ExtractedDocument};
use std::collections::BTreeMap;

/// Immutable snapshot of everything known about one application.
///
/// Built once at the start of a generation job (answers already passed through
/// auto-fill) and shared read-only by all eight generators.
#[derive(Debug, Clone, Default)]
pub struct ApplicationContext {
    answers: DataBag,
    extractions: BTreeMap<String, ExtractedDocument>,
}

impl ApplicationContext {
    pub fn new(answers: DataBag, extractions: BTreeMap<String, ExtractedDocument>) -> Self {
        Self {
            answers,
            extractions,
        }
    }

    /// The questionnaire answer bag (post auto-fill).
    pub fn answers(&self) -> &DataBag {
        &self.answers
    }

    /// Resolve an ordered candidate list to the first non-empty value.
    ///
    /// Each candidate is tried fully before moving to the next: exact lookup in
    /// the answer bag first, then, if the candidate is a dotted
    /// `doc_type.field` key, the extraction map. Returns `FieldValue::Null`
    /// when nothing matches; never errors.
    pub fn resolve(&self, candidates: &[&str]) -> FieldValue {
        for candidate in candidates {
            if let Some(value) = self.answers.get(*candidate) {
                if !value.is_empty() {
                    return value.clone();
                }
            }

            if let Some((doc_type, field)) = candidate.split_once('.') {
                if let Some(extraction) = self.extractions.get(doc_type) {
                    if extraction.is_usable() {
                        if let Some(value) = extraction.fields.get(field) {
                            if !value.is_empty() {
                                return value.clone();
                            }
                        }
                    }
                }
            }
        }

        FieldValue::Null
    }

    /// Resolve to display text; empty string when nothing matches.
    pub fn resolve_text(&self, candidates: &[&str]) -> String {
        self.resolve(candidates).as_text()
    }

    /// Resolve to display text with a static fallback for empty results.
    pub fn resolve_text_or(&self, candidates: &[&str], fallback: &str) -> String {
        let text = self.resolve_text(candidates);
        if text.is_empty() {
            fallback.to_string()
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with(
        answers: &[(&str, FieldValue)],
        extractions: &[(&str, &[(&str, FieldValue)])],
    ) -> ApplicationContext {
        let answers = answers
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let extractions = extractions
            .iter()
            .map(|(doc, fields)| {
                (
                    doc.to_string(),
                    ExtractedDocument {
                        fields: fields
                            .iter()
                            .map(|(k, v)| (k.to_string(), v.clone()))
                            .collect(),
                        confidence: 90,
                        error: None,
                    },
                )
            })
            .collect();
        ApplicationContext::new(answers, extractions)
    }

    #[test]
    fn questionnaire_outranks_extraction() {
        let ctx = context_with(
            &[("full_name", FieldValue::Text("Jane Doe".into()))],
            &[("passport_copy", &[("full_name", FieldValue::Text("JANE DOE OCR".into()))])],
        );
        assert_eq!(
            ctx.resolve_text(&["full_name", "passport_copy.full_name"]),
            "Jane Doe"
        );
    }

    #[test]
    fn first_match_wins_across_candidates() {
        let ctx = context_with(
            &[
                ("a", FieldValue::Text("first".into())),
                ("b", FieldValue::Text("second".into())),
            ],
            &[],
        );
        assert_eq!(ctx.resolve_text(&["a", "b"]), "first");
    }

    #[test]
    fn empty_values_fall_through() {
        let ctx = context_with(
            &[("a.x", FieldValue::Text("  ".into()))],
            &[("b", &[("y", FieldValue::Text("5".into()))])],
        );
        assert_eq!(ctx.resolve_text(&["a.x", "b.y"]), "5");
    }

    #[test]
    fn errored_extractions_contribute_nothing() {
        let mut extractions = BTreeMap::new();
        extractions.insert(
            "passport_copy".to_string(),
            ExtractedDocument {
                fields: [(
                    "full_name".to_string(),
                    FieldValue::Text("Someone".into()),
                )]
                .into_iter()
                .collect(),
                confidence: 0,
                error: Some("unreadable scan".into()),
            },
        );
        let ctx = ApplicationContext::new(DataBag::new(), extractions);
        assert!(ctx.resolve(&["passport_copy.full_name"]).is_empty());
    }

    #[test]
    fn unresolvable_candidates_yield_null() {
        let ctx = context_with(&[], &[]);
        assert_eq!(ctx.resolve(&["missing", "also.missing"]), FieldValue::Null);
        assert_eq!(ctx.resolve_text_or(&["missing"], "N/A"), "N/A");
    }
}
