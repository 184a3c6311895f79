//! Travel itinerary generator.
//!
//! Oracle-generated day-by-day plan, anchored by a one-shot exemplar and
//! requested as structured JSON. If the response cannot be parsed as the
//! expected structure the document falls back to a "to be confirmed"
//! placeholder; it is never left blank.

use super::common::format_display_date;
use super::{DocumentGenerator, DocumentLayout, DocumentType, GenerationContext, GeneratorError};
use crate::oracle::parse_structured;
use async_trait::async_trait;
use chrono::Duration;
use log::warn;
use serde::Deserialize;

pub struct TravelItineraryGenerator;

#[derive(Debug, Deserialize)]
struct ItineraryResponse {
    days: Vec<ItineraryDay>,
}

#[derive(Debug, Deserialize)]
struct ItineraryDay {
    day: String,
    date: String,
    title: String,
    activities: Vec<String>,
}

const EXEMPLAR: &str = r#"{
  "days": [
    {
      "day": "Day 1",
      "date": "2026-06-10",
      "title": "Arrival in Rome",
      "activities": ["Arrive at Fiumicino Airport", "Check in at hotel", "Evening walk around Piazza Navona"]
    },
    {
      "day": "Day 2",
      "date": "2026-06-11",
      "title": "Historic centre",
      "activities": ["Colosseum and Roman Forum", "Lunch near Pantheon", "Trevi Fountain at sunset"]
    }
  ]
}"#;

const PLACEHOLDER_NOTE: &str =
    "Detailed day-by-day plan to be confirmed upon visa approval and flight booking.";

impl TravelItineraryGenerator {
    fn build_prompt(ctx: &GenerationContext) -> String {
        let destination = ctx.data.resolve_text_or(&["destination_country"], "the destination");
        let departure = ctx.data.resolve_text_or(&["departure_date"], "");
        let duration = ctx.data.resolve_text_or(&["duration_days"], "10");
        let purpose = ctx.data.resolve_text_or(&["travel_purpose"], "tourism");

        format!(
            "Create a realistic day-by-day travel itinerary for a {duration}-day trip to \
             {destination}, starting {departure}, purpose: {purpose}. \
             Respond with ONLY a JSON object shaped exactly like this example:\n{EXEMPLAR}"
        )
    }

    /// Placeholder skeleton: one row per day, dates still accurate.
    fn placeholder_days(ctx: &GenerationContext) -> Vec<ItineraryDay> {
        let departure = ctx.data.resolve(&["departure_date"]).as_date();
        let duration = ctx
            .data
            .resolve(&["duration_days"])
            .as_amount()
            .map(|n| n.max(1.0) as i64)
            .unwrap_or(7)
            .min(30);

        (0..duration)
            .map(|i| {
                let date = departure
                    .map(|d| format_display_date(d + Duration::days(i)))
                    .unwrap_or_else(|| "TBC".to_string());
                ItineraryDay {
                    day: format!("Day {}", i + 1),
                    date,
                    title: "Itinerary to be confirmed".to_string(),
                    activities: vec![PLACEHOLDER_NOTE.to_string()],
                }
            })
            .collect()
    }
}

#[async_trait]
impl DocumentGenerator for TravelItineraryGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::TravelItinerary
    }

    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError> {
        let days = match ctx.oracle.generate_text(&Self::build_prompt(ctx)).await {
            Ok(raw) => match parse_structured::<ItineraryResponse>(&raw) {
                Some(parsed) if !parsed.days.is_empty() => parsed.days,
                _ => {
                    warn!("itinerary oracle output unusable, composing placeholder plan");
                    Self::placeholder_days(ctx)
                }
            },
            Err(err) => {
                warn!("itinerary oracle call failed, composing placeholder plan: {err}");
                Self::placeholder_days(ctx)
            }
        };

        let destination = ctx.data.resolve_text_or(&["destination_country"], "Destination");
        let traveller = ctx.data.resolve_text_or(&["full_name", "passport_copy.full_name"], "Applicant");

        let rows = days
            .iter()
            .map(|day| {
                vec![
                    day.day.clone(),
                    day.date.clone(),
                    day.title.clone(),
                    day.activities.join("; "),
                ]
            })
            .collect();

        Ok(DocumentLayout::new("Travel Itinerary")
            .heading(format!("Travel Itinerary: {destination}"))
            .key_values(vec![
                ("Traveller".to_string(), traveller),
                (
                    "Departure".to_string(),
                    ctx.data.resolve_text_or(&["departure_date"], "TBC"),
                ),
                (
                    "Return".to_string(),
                    ctx.data.resolve_text_or(&["return_date"], "TBC"),
                ),
            ])
            .spacer()
            .table(
                vec![
                    "Day".to_string(),
                    "Date".to_string(),
                    "Plan".to_string(),
                    "Activities".to_string(),
                ],
                rows,
            ))
    }
}
