//! Network collaborators used by the controllers.
//!
//! The controllers only see the traits; `ChatApiClient` and `Web3FormsClient`
//! are the HTTP implementations used in production.

pub mod chat;
pub mod intake;

pub use chat::ChatApiClient;
pub use intake::Web3FormsClient;

use anyhow::Result;
use serde::Serialize;

/// Body of a question forwarded to the remote assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    pub message: String,
    pub context: String,
}

/// Remote assistant that answers questions the FAQ could not.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    /// `Ok(None)` means the endpoint answered but gave no usable reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>>;
}

/// What the intake endpoint said about a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOutcome {
    pub success: bool,
    pub message: Option<String>,
}

/// Third-party form intake.
#[async_trait::async_trait]
pub trait IntakeService: Send + Sync {
    /// `Err` means the request never completed; a rejected submission is an
    /// `Ok` outcome with `success == false`.
    async fn submit(&self, fields: &[(String, String)]) -> Result<IntakeOutcome>;
}
