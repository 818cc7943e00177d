use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;

use super::{CompletionRequest, CompletionService};

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: Option<String>,
}

/// JSON client for the site's `/api/chat` endpoint.
#[derive(Clone)]
pub struct ChatApiClient {
    client: Client,
    url: String,
}

impl ChatApiClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl CompletionService for ChatApiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Chat request failed with status: {}",
                response.status()
            ));
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.reply.filter(|reply| !reply.is_empty()))
    }
}
