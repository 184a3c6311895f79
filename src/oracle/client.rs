//! HTTP oracle client (OpenAI-compatible chat completions).
//!
//! Configuration comes from the environment; transient transport and 5xx
//! failures are retried with exponential backoff. Content quality is the
//! caller's problem; this client only guarantees "some non-empty text or
//! an `OracleError`".

use super::{OracleError, TextOracle};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Oracle connection settings, read from the environment.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl OracleConfig {
    /// `None` when `ORACLE_API_KEY` is unset; the server then runs with the
    /// static fallback oracle.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("ORACLE_API_KEY").ok()?;
        Some(Self {
            api_url: env::var("ORACLE_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            api_key,
            model: env::var("ORACLE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }
}

pub struct HttpTextOracle {
    client: reqwest::Client,
    config: OracleConfig,
}

impl HttpTextOracle {
    pub fn new(config: OracleConfig, client: reqwest::Client) -> Self {
        info!("oracle client configured for model {}", config.model);
        Self { client, config }
    }

    async fn call_once(&self, prompt: &str) -> Result<String, backoff::Error<OracleError>> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                // connect/timeout trouble is worth retrying
                backoff::Error::transient(OracleError::Request(err.to_string()))
            })?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            warn!("oracle returned {status}, retrying");
            return Err(backoff::Error::transient(OracleError::Request(format!(
                "status {status}"
            ))));
        }
        if !status.is_success() {
            return Err(backoff::Error::permanent(OracleError::Request(format!(
                "status {status}"
            ))));
        }

        let body: ChatResponse = response.json().await.map_err(|err| {
            backoff::Error::permanent(OracleError::Request(err.to_string()))
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(backoff::Error::permanent(OracleError::EmptyResponse));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextOracle for HttpTextOracle {
    async fn generate_text(&self, prompt: &str) -> Result<String, OracleError> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(500))
            .with_max_interval(Duration::from_secs(8))
            .with_max_elapsed_time(Some(Duration::from_secs(60)))
            .build();

        backoff::future::retry(policy, || self.call_once(prompt)).await
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
