//! Generative suggestions from the Gemini API.
//!
//! Only the interactive suggestion path uses this; `recommend` never does.
//! The client sits behind [`TextGenerator`] so hosts can swap in a stub.

use crate::error::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-002";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1/models";

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Reads `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServiceError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ServiceError::MissingApiKey)?;
        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ServiceError::InvalidConfig(format!("GEMINI_TIMEOUT_SECS={raw:?}: {e}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ServiceError::InvalidConfig(
                "GEMINI_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, ServiceError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// The key travels in the `x-goog-api-key` header, never in the URL.
    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.config.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = self.endpoint();
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling generation API");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.config.timeout)
                } else {
                    ServiceError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Generation API returned an error");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        extract_text(parsed)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, ServiceError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| ServiceError::MalformedResponse("no candidate text".to_string()))
}

/// Prompt asking the model for a CSV-style table of assessments.
pub fn build_suggestion_prompt(query: &str) -> String {
    format!(
        "You are an AI assistant that recommends SHL assessments based on job descriptions.\n\
         Given the job description below, suggest 3-10 SHL assessments in table format:\n\n\
         **Query:** {query}\n\n\
         **Output format (CSV-style)**:\n\
         Assessment Name,Assessment URL,Remote Testing Support,Adaptive/IRT Support,Duration,Test Type\n\
         Example Test,https://example.com,Yes,No,30 min,Personality\n"
    )
}

/// A table recovered from a generated reply: the first comma-bearing line is
/// the header, the rest are rows padded to a common width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn parse_suggestion_table(reply: &str) -> Result<SuggestionTable, ServiceError> {
    let mut lines: Vec<Vec<String>> = reply
        .trim()
        .lines()
        .filter(|line| line.contains(','))
        .map(|line| line.trim().split(',').map(|cell| cell.trim().to_string()).collect())
        .collect();

    let width = lines.iter().map(Vec::len).max().ok_or_else(|| {
        ServiceError::MalformedResponse("reply contains no comma-separated rows".to_string())
    })?;
    for line in &mut lines {
        line.resize(width, String::new());
    }

    let header = lines.remove(0);
    Ok(SuggestionTable {
        header,
        rows: lines,
    })
}

/// Ask the generator for suggestions and parse its reply into a table.
pub async fn suggest(generator: &dyn TextGenerator, query: &str) -> Result<SuggestionTable, ServiceError> {
    let reply = generator.generate(&build_suggestion_prompt(query)).await?;
    parse_suggestion_table(&reply)
}
