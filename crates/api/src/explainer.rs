//! Clue explanations from an OpenAI-compatible chat-completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ExplainerConfig;

const SYSTEM_PROMPT: &str = "You are a crossword expert. Given a crossword clue and its answer, \
explain in two or three sentences why the answer fits the clue. Mention any wordplay, \
abbreviations, or cultural references.";

#[derive(Debug, thiserror::Error)]
pub enum ExplainerError {
    /// Connection failed, timed out, etc.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response or an empty completion.
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Produces a human-readable explanation of why an answer fits a clue.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, clue: &str, answer: &str) -> Result<String, ExplainerError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// [`Explainer`] backed by `POST {base_url}/chat/completions`.
#[derive(Clone)]
pub struct ChatCompletionsExplainer {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatCompletionsExplainer {
    pub fn new(config: &ExplainerConfig) -> Self {
        Self {
            http_client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

fn user_prompt(clue: &str, answer: &str) -> String {
    format!("Clue: {clue}\nAnswer: {answer}")
}

#[async_trait]
impl Explainer for ChatCompletionsExplainer {
    async fn explain(&self, clue: &str, answer: &str) -> Result<String, ExplainerError> {
        let start = std::time::Instant::now();
        let prompt = user_prompt(clue, answer);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Explainer request failed");
                ExplainerError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %error_text, "Explainer API error");
            return Err(ExplainerError::Api(format!("status {status}: {error_text}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExplainerError::Parse(e.to_string()))?;

        let explanation = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ExplainerError::Api("No explanation in response".into()))?;

        tracing::debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "Generated explanation"
        );

        Ok(explanation)
    }
}
