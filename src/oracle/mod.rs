//! Text-generation oracle seam.
//!
//! The LLM is an untrusted collaborator: it may be down, slow, or return
//! free text where JSON was requested. Generators go through `TextOracle`
//! and the parse helpers here, so oracle trouble degrades to fallback
//! content and is never a reason for a document to fail.

pub mod client;

pub use client::{HttpTextOracle, OracleConfig};

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle is not configured")]
    NotConfigured,
    #[error("oracle request failed: {0}")]
    Request(String),
    #[error("oracle returned an empty response")]
    EmptyResponse,
}

/// External text-generation service: `(prompt) -> text`, may fail, may
/// return unparsable content.
#[async_trait]
pub trait TextOracle: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, OracleError>;
}

/// Stand-in used when no oracle is configured. Every call fails with
/// `NotConfigured`, which generators already treat as "use the fallback
/// content", so documents still render.
pub struct StaticFallbackOracle;

#[async_trait]
impl TextOracle for StaticFallbackOracle {
    async fn generate_text(&self, _prompt: &str) -> Result<String, OracleError> {
        Err(OracleError::NotConfigured)
    }
}

lazy_static! {
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?s)^\s*```[a-zA-Z0-9_-]*\s*\n?(.*?)\n?\s*```\s*$").unwrap();
}

/// Strip a wrapping Markdown code fence if the whole payload is fenced.
pub fn strip_code_fences(raw: &str) -> &str {
    match CODE_FENCE.captures(raw) {
        Some(captures) => captures.get(1).map(|m| m.as_str()).unwrap_or(raw),
        None => raw.trim(),
    }
}

/// Attempt a strict structured decode of oracle output.
///
/// Strips an optional code fence, then tries serde. On failure returns `None`
/// and logs the head of the raw content; callers fall back to their declared
/// default structure, never to an error.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<T>(cleaned) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            let head: String = cleaned.chars().take(160).collect();
            warn!("oracle output failed structured parse ({err}); head: {head:?}");
            None
        }
    }
}

lazy_static! {
    static ref MARKUP: Regex = Regex::new(r"[*_#`>\[\]|~]").unwrap();
}

/// Remove markup characters that leak through despite prompt instructions.
pub fn strip_markup(raw: &str) -> String {
    MARKUP.replace_all(raw, "").to_string()
}

/// Cap prose at a word budget, keeping whole words and paragraph breaks.
pub fn cap_words(raw: &str, max_words: usize) -> String {
    let total = raw.split_whitespace().count();
    if total <= max_words {
        return raw.trim().to_string();
    }

    let mut remaining = max_words;
    let mut paragraphs: Vec<String> = Vec::new();
    for paragraph in raw.split("\n\n") {
        if remaining == 0 {
            break;
        }
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        let take = words.len().min(remaining);
        paragraphs.push(words[..take].join(" "));
        remaining -= take;
    }

    let mut capped = paragraphs.join("\n\n");
    capped.push('.');
    capped
}
