/*!
 * # Completion Client
 *
 * Thin client for the generative-text service consumed by the insight
 * workflows. Modeled as a single `complete(prompt, max_tokens) -> text`
 * capability so tests can substitute a canned implementation.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

use crate::config::CompletionConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Request(String),
    #[error("Completion service returned status {0}")]
    Status(u16),
    #[error("Malformed completion response: {0}")]
    Malformed(String),
}

impl From<CompletionError> for crate::errors::ServiceError {
    fn from(err: CompletionError) -> Self {
        crate::errors::ServiceError::ExternalServiceError(err.to_string())
    }
}

/// Generative-text capability injected into the insight workflows.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submits a prompt with an output-token budget and returns the trimmed
    /// completion text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// OpenAI-compatible completion endpoint client.
#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: &CompletionConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                prompt,
                max_tokens,
            })
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CompletionError::Status(response.status().as_u16()));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Malformed("response carried no choices".into()))?;

        Ok(choice.text.trim().to_string())
    }
}

/// Canned completion client for tests: returns a fixed response and records
/// every prompt it receives.
#[derive(Debug, Default)]
pub struct CannedCompletionClient {
    response: String,
    calls: Mutex<Vec<(String, u32)>>,
}

impl CannedCompletionClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for CannedCompletionClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        Ok(self.response.trim().to_string())
    }
}

/// Completion client that always fails; used to verify dependency errors
/// surface as 502s on the insight endpoints.
#[derive(Debug, Default)]
pub struct FailingCompletionClient;

#[async_trait]
impl CompletionClient for FailingCompletionClient {
    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, CompletionError> {
        Err(CompletionError::Request(
            "completion service unreachable".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn complete_submits_prompt_and_trims_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo-instruct",
                "max_tokens": 200
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "text": "\n\n  Sales rose sharply.  " }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiCompletionClient::new(&CompletionConfig {
            api_key: "sk-test".into(),
            base_url: server.uri(),
            model: "gpt-3.5-turbo-instruct".into(),
            timeout_secs: 5,
        });

        let text = client.complete("Analyze the sales data", 200).await.unwrap();
        assert_eq!(text, "Sales rose sharply.");
    }

    #[tokio::test]
    async fn complete_surfaces_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OpenAiCompletionClient::new(&CompletionConfig {
            api_key: "sk-test".into(),
            base_url: server.uri(),
            model: "gpt-3.5-turbo-instruct".into(),
            timeout_secs: 5,
        });

        let err = client.complete("prompt", 10).await.unwrap_err();
        assert!(matches!(err, CompletionError::Status(500)));
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = OpenAiCompletionClient::new(&CompletionConfig {
            api_key: "sk-test".into(),
            base_url: server.uri(),
            model: "gpt-3.5-turbo-instruct".into(),
            timeout_secs: 5,
        });

        let err = client.complete("prompt", 10).await.unwrap_err();
        assert!(matches!(err, CompletionError::Malformed(_)));
    }

    #[tokio::test]
    async fn canned_client_records_calls() {
        let client = CannedCompletionClient::new("1. Espresso\n2. Scone");

        let text = client.complete("suggest products", 100).await.unwrap();
        assert_eq!(text, "1. Espresso\n2. Scone");
        assert_eq!(client.calls(), vec![("suggest products".to_string(), 100)]);
    }
}
