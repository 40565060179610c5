//! Claude API integration for cycle predictions.
//!
//! Asks the model for a second opinion on the deterministic forecast plus a
//! short analysis and health tips. The response is returned as an
//! unvalidated [`AiSuggestion`]; deciding whether to trust it is up to
//! [`cycle_core::CycleReport::enhance`].

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use cycle_core::{
    AiSuggestion, CalendarDate, CycleEntry, CyclePrediction, CycleReport, CycleStatistics,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PREDICTION_MAX_TOKENS: u32 = 1024;
const PREDICTION_TEMPERATURE: f32 = 0.2;
/// Number of most recent entries included in the prompt.
pub const PROMPT_HISTORY_LIMIT: usize = 5;

/// Matches a Markdown code fence wrapped around the whole reply.
static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*\n?(.*?)\n?\s*```$").unwrap());

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Claude API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Creates a new client whose requests give up after `timeout`.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self { http, api_key })
    }

    /// Asks the model for a prediction with analysis and health tips.
    pub async fn suggest_prediction(
        &self,
        model: &str,
        input: &PredictionRequest,
    ) -> Result<AiSuggestion, LlmError> {
        let prompt = build_prediction_prompt(input);
        let request = MessageRequest {
            model: model.to_string(),
            max_tokens: PREDICTION_MAX_TOKENS,
            temperature: PREDICTION_TEMPERATURE,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model, entries = input.entries.len(), "requesting AI prediction");
        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        let text = extract_text(payload.content)?;
        parse_suggestion(&text)
    }
}

/// Context handed to the model.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub today: CalendarDate,
    /// Most recent entries, oldest first.
    pub entries: Vec<CycleEntry>,
    pub statistics: CycleStatistics,
    pub baseline: CyclePrediction,
}

impl PredictionRequest {
    /// Builds the request from a deterministic report.
    pub fn from_report(report: &CycleReport, today: CalendarDate) -> Self {
        Self {
            today,
            entries: report
                .history()
                .recent_entries(PROMPT_HISTORY_LIMIT)
                .cloned()
                .collect(),
            statistics: report.statistics.clone(),
            baseline: report.prediction.dates().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    /// Thinking, tool use and any other non-text block.
    #[serde(other)]
    Other,
}

fn extract_text(blocks: Vec<ContentBlock>) -> Result<String, LlmError> {
    let pieces: Vec<String> = blocks
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_prediction_prompt(input: &PredictionRequest) -> String {
    let mut lines = Vec::new();
    lines.push(
        "You are a menstrual health assistant. Review a cycle history and a computed forecast."
            .to_string(),
    );
    lines.push(
        "Return strict JSON with these fields (dates as YYYY-MM-DD): \
         {\"nextPeriodStart\":\"...\",\"nextPeriodEnd\":\"...\",\"ovulationDate\":\"...\",\
         \"fertileWindowStart\":\"...\",\"fertileWindowEnd\":\"...\",\
         \"analysis\":\"...\",\"healthTips\":[\"...\"]}"
            .to_string(),
    );
    lines.push("Rules:".to_string());
    lines.push("- Keep the computed forecast unless the history clearly supports a change.".to_string());
    lines.push("- The analysis is two or three sentences; give 2-4 short health tips.".to_string());
    lines.push("- Do not give a diagnosis. Respond with the JSON object only.".to_string());
    lines.push(String::new());
    lines.push(format!("today: {}", input.today));

    if input.entries.is_empty() {
        lines.push("history: none".to_string());
    } else {
        lines.push("history:".to_string());
        for entry in &input.entries {
            let mut line = format!("- started {}", entry.start_date);
            if let Some(end) = entry.end_date {
                line.push_str(&format!(", ended {end}"));
            }
            if let Some(flow) = entry.flow_level {
                line.push_str(&format!(", flow {flow}"));
            }
            if !entry.symptoms.is_empty() {
                let symptoms = entry
                    .symptoms
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                line.push_str(&format!(", symptoms: {symptoms}"));
            }
            lines.push(line);
        }
    }

    let stats = &input.statistics;
    lines.push(format!(
        "statistics: average cycle {:.1} days, average period {:.1} days, variability {:.1} days, {} complete cycles, confidence {}",
        stats.average_cycle_length_days,
        stats.average_period_length_days,
        stats.cycle_variability_days,
        stats.sample_size,
        stats.confidence,
    ));

    let baseline = &input.baseline;
    lines.push(format!(
        "computed forecast: period {}..{}, ovulation {}, fertile window {}..{}",
        baseline.next_period_start,
        baseline.next_period_end,
        baseline.ovulation_date,
        baseline.fertile_window_start,
        baseline.fertile_window_end,
    ));
    lines.join("\n")
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    CODE_FENCE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str().trim())
}

fn parse_suggestion(text: &str) -> Result<AiSuggestion, LlmError> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|err| LlmError::InvalidResponse(err.to_string()))
}
