//! Chat-completions client for medicine analysis.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::analyze::{parse_medicine_facts, AnalyzeError, AnalyzeResult, MedicineFacts};
use crate::prompts::{make_analyze_prompt, SYSTEM_PROMPT};
use crate::quota::{DailyQuota, QuotaError};

/// Upstream request timeout. The call suspends only the form awaiting the
/// result, so a stuck request must fail visibly rather than hang.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";

/// Default model.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Errors from the quota-guarded autofill flow.
#[derive(Error, Debug)]
pub enum AutofillError {
    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

/// Blocking client for one analysis exchange.
pub struct AnalyzeClient {
    endpoint: String,
    model: String,
    api_key: String,
    http: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl AnalyzeClient {
    /// Build a client against the default endpoint.
    pub fn new(api_key: String) -> AnalyzeResult<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT.into(), DEFAULT_MODEL.into(), api_key)
    }

    /// Build a client against a custom endpoint/model.
    pub fn with_endpoint(endpoint: String, model: String, api_key: String) -> AnalyzeResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnalyzeError::Request(e.to_string()))?;
        Ok(Self {
            endpoint,
            model,
            api_key,
            http,
        })
    }

    /// Run one analysis exchange.
    pub fn analyze(&self, input: &str) -> AnalyzeResult<MedicineFacts> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": make_analyze_prompt(input) },
            ],
            "response_format": { "type": "json_object" },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| AnalyzeError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalyzeError::Request(format!(
                "HTTP {} from {}",
                response.status(),
                self.endpoint
            )));
        }

        let data: ChatResponse = response
            .json()
            .map_err(|e| AnalyzeError::Request(e.to_string()))?;
        let content = data
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| AnalyzeError::InvalidFormat("Response has no choices".into()))?;

        parse_medicine_facts(content)
    }

    /// Quota-guarded analysis: an exhausted quota fails before any request
    /// is issued, and only a successful call consumes a use.
    pub fn analyze_with_quota(
        &self,
        quota: &mut DailyQuota,
        today: NaiveDate,
        input: &str,
    ) -> Result<MedicineFacts, AutofillError> {
        quota.check(today)?;
        let facts = self.analyze(input)?;
        quota.record_success(today);
        Ok(facts)
    }
}
