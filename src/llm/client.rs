use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::limiter::FixedIntervalLimiter;

/// Transport-level failure of a generation request.
///
/// These are the expected failures of the backend boundary: they are
/// recovered into degraded-but-total records at the orchestrators and are
/// never retried automatically.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation backend returned {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("generation response contained no text")]
    EmptyResponse,
}

/// The "send prompt, receive text" capability.
///
/// Orchestrators are generic over this so tests can inject scripted
/// backends in place of the HTTP client.
pub trait TextGenerator {
    /// Send one prompt to the backend and return the raw response text
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// Configuration for the Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (from GEMINI_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "gemini-2.0-flash")
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_output_tokens: u32,
    /// Minimum delay between consecutive requests (backend rate limit)
    pub min_call_interval: Duration,
}

impl GeminiConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.2,
            max_output_tokens: 2048,
            min_call_interval: Duration::from_millis(500),
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.2,
            max_output_tokens: 2048,
            min_call_interval: Duration::from_millis(500),
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    limiter: FixedIntervalLimiter,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let limiter = FixedIntervalLimiter::new(config.min_call_interval);
        Self {
            client: Client::new(),
            config,
            limiter,
        }
    }

    async fn send(&self, prompt: &str) -> Result<String, TransportError> {
        // Pace every request; the backend enforces a per-caller rate limit
        self.limiter.acquire().await;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Backend { status, body });
        }

        let response: GenerateContentResponse = response.json().await?;

        // Extract text from the first candidate's content parts
        response
            .candidates
            .into_iter()
            .flat_map(|c| c.content.map(|content| content.parts).unwrap_or_default())
            .map(|p| p.text)
            .find(|text| !text.is_empty())
            .ok_or(TransportError::EmptyResponse)
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, TransportError> {
        self.send(prompt).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
