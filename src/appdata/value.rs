//! Typed field values.
//!
//! Application data arrives from JSON stores as loosely-typed maps. `FieldValue`
//! is the typed bridge: every answer, extracted field, and auto-filled value is
//! one of these variants, so resolution and rendering code can ask "is this
//! empty?", "give me display text", "give me a number" without re-parsing JSON
//! at every call site.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

/// A single field value flowing through the generation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// True when the value carries no usable content: null, whitespace-only
    /// text, or an empty collection. Booleans and zero are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Map(entries) => entries.is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) | FieldValue::Date(_) => false,
        }
    }

    /// Display form used by document layouts. Dates render ISO, integral
    /// numbers drop the trailing `.0`, collections render empty (layouts
    /// handle collections themselves).
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Bool(b) => {
                if *b {
                    "yes".to_string()
                } else {
                    "no".to_string()
                }
            }
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::List(_) | FieldValue::Map(_) => String::new(),
        }
    }

    /// Numeric reading tolerant of formatted money text: strips thousands
    /// separators, currency labels, and surrounding prose. Returns `None`
    /// when no digits are present at all.
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => parse_amount_text(s),
            _ => None,
        }
    }

    /// Date reading: accepts a `Date` variant or ISO-8601 text.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        }
    }

    /// Boolean reading: accepts `Bool` or the usual textual spellings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Some(true),
                "false" | "no" | "n" | "0" => Some(false),
                _ => None,
            },
            FieldValue::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// Borrow the list items when this is a `List`.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the entries when this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Convenience lookup into a `Map` variant; `Null` for anything else.
    pub fn get(&self, key: &str) -> FieldValue {
        match self {
            FieldValue::Map(entries) => entries.get(key).cloned().unwrap_or(FieldValue::Null),
            _ => FieldValue::Null,
        }
    }

    /// Convert from the JSON a store hands us. Lossless apart from JSON's
    /// null/number unification; ISO date strings stay `Text` (callers use
    /// `as_date` when they need one).
    pub fn from_json(value: &Value) -> FieldValue {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(items) => {
                FieldValue::List(items.iter().map(FieldValue::from_json).collect())
            }
            Value::Object(entries) => FieldValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert back to JSON for persistence.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            FieldValue::List(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            FieldValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// Parse the numeric portion of money-like text. `"BDT 1,500,000 (approx)"`
/// reads as `1500000.0`; text with no digits reads as `None`.
fn parse_amount_text(raw: &str) -> Option<f64> {
    let mut cleaned = String::new();
    let mut seen_digit = false;
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            cleaned.push(ch);
            seen_digit = true;
        } else if ch == '.' && seen_digit && !cleaned.contains('.') {
            cleaned.push(ch);
        } else if ch == ',' {
            // thousands separator
            continue;
        } else if seen_digit {
            // stop at the first non-numeric run after the number
            break;
        }
    }

    if !seen_digit {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_detection() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Text("   ".into()).is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Text("x".into()).is_empty());
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(FieldValue::Number(150000.0).as_text(), "150000");
        assert_eq!(FieldValue::Number(1.5).as_text(), "1.5");
    }

    #[test]
    fn amount_parsing_strips_separators_and_labels() {
        assert_eq!(
            FieldValue::Text("1,000,000".into()).as_amount(),
            Some(1_000_000.0)
        );
        assert_eq!(
            FieldValue::Text("BDT 500,000 approx".into()).as_amount(),
            Some(500_000.0)
        );
        assert_eq!(FieldValue::Text("as per documents".into()).as_amount(), None);
        assert_eq!(FieldValue::Text("12.5".into()).as_amount(), Some(12.5));
    }

    #[test]
    fn date_parsing_accepts_iso_text() {
        let d = FieldValue::Text("2026-03-15".into()).as_date();
        assert_eq!(d, Some(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
        assert_eq!(FieldValue::Text("next week".into()).as_date(), None);
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let json: Value = serde_json::json!({
            "name": "Jane",
            "accounts": [{"bank": "City Bank", "balance": 120000.0}],
            "married": true
        });
        let value = FieldValue::from_json(&json);
        assert_eq!(value.get("name").as_text(), "Jane");
        let accounts = value.get("accounts");
        let first = &accounts.as_list().unwrap()[0];
        assert_eq!(first.get("balance").as_amount(), Some(120000.0));
        assert_eq!(value.to_json(), json);
    }
}
