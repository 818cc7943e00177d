use anyhow::{anyhow, Result};
use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;

use super::{IntakeOutcome, IntakeService};

pub const ACCESS_KEY_FIELD: &str = "access_key";

#[derive(Deserialize)]
struct IntakeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Multipart client for a Web3Forms-style intake endpoint.
#[derive(Clone)]
pub struct Web3FormsClient {
    client: Client,
    url: String,
    access_key: String,
}

impl Web3FormsClient {
    pub fn new(url: &str, access_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
            access_key: access_key.to_string(),
        }
    }

    fn form(&self, fields: &[(String, String)]) -> Form {
        fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
            .text(ACCESS_KEY_FIELD, self.access_key.clone())
    }
}

#[async_trait::async_trait]
impl IntakeService for Web3FormsClient {
    async fn submit(&self, fields: &[(String, String)]) -> Result<IntakeOutcome> {
        let response = self
            .client
            .post(&self.url)
            .multipart(self.form(fields))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<IntakeResponse>(&body) {
            Ok(parsed) => Ok(IntakeOutcome {
                success: parsed.success && status.is_success(),
                message: parsed.message.filter(|m| !m.trim().is_empty()),
            }),
            Err(_) if !status.is_success() => Ok(IntakeOutcome {
                success: false,
                message: None,
            }),
            Err(e) => Err(anyhow!("Intake returned an unreadable body ({}): {}", status, e)),
        }
    }
}
