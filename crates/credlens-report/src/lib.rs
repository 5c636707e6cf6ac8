//! Client for the hosted text-generation (completions) service.
//!
//! Posts a prompt with a generation-length cap and returns the first
//! completion choice. The bearer token always comes from configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("generation API error: {0}")]
    Api(String),
    #[error("generation response contained no choices")]
    NoChoices,
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// Client for the completions API (legacy per-engine route).
pub struct ReportClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    model: String,
}

impl ReportClient {
    /// `timeout` bounds each generation request; the vendor call otherwise
    /// has no server-side deadline.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ReportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("credlens-report/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_token: api_token.into(),
            model: model.into(),
        })
    }

    /// Generate a completion for `prompt`, returning the first choice's text.
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ReportError> {
        let url = format!(
            "{}/v1/engines/{}/completions",
            self.base_url, self.model
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&CompletionRequest { prompt, max_tokens })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ReportError::Api(if body.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {body}")
            }));
        }

        let completion: CompletionResponse = resp.json().await?;
        first_choice(completion)
    }
}

fn first_choice(completion: CompletionResponse) -> Result<String, ReportError> {
    completion
        .choices
        .into_iter()
        .next()
        .map(|c| c.text)
        .ok_or(ReportError::NoChoices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_prompt_and_cap() {
        let body = serde_json::to_value(CompletionRequest {
            prompt: "Give a credit report based on the provided financial data:",
            max_tokens: 100,
        })
        .unwrap();
        assert_eq!(
            body["prompt"],
            "Give a credit report based on the provided financial data:"
        );
        assert_eq!(body["max_tokens"], 100);
    }

    #[test]
    fn first_choice_wins() {
        let completion: CompletionResponse = serde_json::from_str(
            r#"{"id":"cmpl-1","choices":[{"text":"Report A","index":0},{"text":"Report B","index":1}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(completion).unwrap(), "Report A");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let completion: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice(completion),
            Err(ReportError::NoChoices)
        ));
    }
}
