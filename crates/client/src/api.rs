//! HTTP client for the Crossword Coach API.

use async_trait::async_trait;
use crosswordcoach_core::query::EntriesQuery;
use crosswordcoach_core::types::{
    EntriesResponse, Entry, ExplanationRequest, ExplanationResponse, GetEntriesOptions,
};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// The two API calls the game makes.
#[async_trait]
pub trait CoachApi: Send + Sync {
    /// One page of entries.
    async fn fetch_entries(&self, options: &GetEntriesOptions) -> Result<Vec<Entry>, ClientError>;

    /// An explanation of why `answer` fits `clue`.
    async fn fetch_explanation(&self, clue: &str, answer: &str) -> Result<String, ClientError>;
}

/// [`CoachApi`] over HTTP using [`reqwest`].
pub struct HttpCoachApi {
    client: reqwest::Client,
    base_url: String,
    entries_path: String,
}

impl HttpCoachApi {
    /// * `base_url` - e.g. `http://localhost:3000`.
    /// * `entries_path` - path of the entries endpoint below `base_url`.
    pub fn new(base_url: &str, entries_path: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, entries_path)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, entries_path: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            entries_path: entries_path.trim_matches('/').to_string(),
        }
    }

    pub fn entries_url(&self) -> String {
        format!("{}/{}", self.base_url, self.entries_path)
    }

    pub fn explain_url(&self) -> String {
        format!("{}/explain", self.base_url)
    }

    // ---- private helpers ----

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CoachApi for HttpCoachApi {
    async fn fetch_entries(&self, options: &GetEntriesOptions) -> Result<Vec<Entry>, ClientError> {
        let query = EntriesQuery::from_options(options);
        let response = self
            .client
            .get(self.entries_url())
            .query(&query.to_pairs())
            .send()
            .await?;

        let body: EntriesResponse = Self::parse_response(response).await?;
        Ok(body.entries)
    }

    async fn fetch_explanation(&self, clue: &str, answer: &str) -> Result<String, ClientError> {
        let request = ExplanationRequest {
            clue: clue.to_string(),
            answer: answer.to_string(),
        };
        let response = self
            .client
            .post(self.explain_url())
            .json(&request)
            .send()
            .await?;

        let body: ExplanationResponse = Self::parse_response(response).await?;
        Ok(body.explanation)
    }
}
