//! Studio chat assistant.
//!
//! A question is first checked against the FAQ; only a miss goes out to the
//! remote assistant. Every accepted user message gets exactly one assistant
//! reply appended, even when the remote side fails. While a reply is pending
//! further messages are rejected with [`DialogueError::Busy`].

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::client::{CompletionRequest, CompletionService};
use crate::knowledge::KnowledgeBase;
use crate::site::SITE_CONTEXT;
use crate::state::ChatMessage;
use crate::task::PendingTask;

/// Reply used when the remote assistant is unreachable or errors out.
pub const FALLBACK_REPLY: &str = "К сожалению, я не нашел ответа на ваш вопрос. Рекомендую посмотреть раздел FAQ или оставить заявку — наш архитектор свяжется с вами лично.";

/// Reply used when the remote assistant answers without any text.
pub const UNPROCESSABLE_REPLY: &str = "Извините, я не смог обработать ваш запрос. Попробуйте переформулировать вопрос или свяжитесь с нами по телефону.";

/// Pause before an FAQ answer is shown, so it reads like a typed reply.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(500);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueError {
    #[error("still waiting for a reply to the previous message")]
    Busy,

    #[error("message is empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    Idle,
    AwaitingResponse,
}

/// Conversation history for one open chat view. Whether a reply is in
/// flight belongs to the controller, not to the history.
#[derive(Debug, Clone, Default)]
pub struct DialogueSession {
    messages: Vec<ChatMessage>,
    greeting: Option<String>,
}

impl DialogueSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that opens with an assistant greeting. The greeting is
    /// restored when the session is cleared.
    pub fn with_greeting(greeting: &str) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(greeting)],
            greeting: Some(greeting.to_string()),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn clear(&mut self) {
        self.messages.clear();
        if let Some(greeting) = &self.greeting {
            self.messages.push(ChatMessage::assistant(greeting.as_str()));
        }
    }
}

pub struct DialogueController {
    session: DialogueSession,
    knowledge: Arc<KnowledgeBase>,
    completion: Arc<dyn CompletionService>,
    context: String,
    reply_delay: Duration,
    generation: u64,
    pending: Option<PendingTask<String>>,
}

impl DialogueController {
    pub fn new(knowledge: Arc<KnowledgeBase>, completion: Arc<dyn CompletionService>) -> Self {
        Self {
            session: DialogueSession::new(),
            knowledge,
            completion,
            context: SITE_CONTEXT.to_string(),
            reply_delay: DEFAULT_REPLY_DELAY,
            generation: 0,
            pending: None,
        }
    }

    /// Swap in a different history. A reply still pending for the old
    /// history is dropped.
    pub fn with_session(mut self, session: DialogueSession) -> Self {
        self.discard_pending();
        self.session = session;
        self
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = context.to_string();
        self
    }

    pub fn state(&self) -> DialogueState {
        if self.pending.is_some() {
            DialogueState::AwaitingResponse
        } else {
            DialogueState::Idle
        }
    }

    pub fn session(&self) -> &DialogueSession {
        &self.session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    /// Record a user message and start producing the reply in the background.
    ///
    /// Must be called from within a tokio runtime. The reply is collected
    /// with [`poll_reply`](Self::poll_reply) or [`wait_reply`](Self::wait_reply).
    pub fn submit_user_message(&mut self, text: &str) -> Result<(), DialogueError> {
        if self.pending.is_some() {
            debug!("message rejected: reply still pending");
            return Err(DialogueError::Busy);
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(DialogueError::EmptyMessage);
        }

        self.session.messages.push(ChatMessage::user(text));
        self.generation += 1;

        let task = match self.knowledge.resolve(text) {
            Some(answer) => {
                let answer = answer.to_string();
                let delay = self.reply_delay;
                PendingTask::spawn(self.generation, async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    answer
                })
            }
            None => {
                info!("no faq match, asking remote assistant");
                let request = CompletionRequest {
                    message: text.to_string(),
                    context: self.context.clone(),
                };
                PendingTask::spawn(
                    self.generation,
                    remote_reply(Arc::clone(&self.completion), request),
                )
            }
        };

        self.pending = Some(task);
        Ok(())
    }

    /// Append the pending reply if it has arrived. Never blocks.
    pub fn poll_reply(&mut self) -> Option<&ChatMessage> {
        let outcome = self.pending.as_mut()?.try_take()?;
        let task = self.pending.take()?;
        self.finish(task.generation(), outcome)
    }

    /// Wait for the pending reply and append it. Returns `None` when nothing
    /// was pending.
    pub async fn wait_reply(&mut self) -> Option<&ChatMessage> {
        let outcome = self.pending.as_mut()?.wait().await;
        let task = self.pending.take()?;
        self.finish(task.generation(), outcome)
    }

    /// Close the conversation: drop any pending reply and clear history.
    pub fn reset(&mut self) {
        self.discard_pending();
        self.session.clear();
    }

    fn discard_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
        self.generation += 1;
    }

    fn finish(
        &mut self,
        generation: u64,
        outcome: Result<String, JoinError>,
    ) -> Option<&ChatMessage> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale reply");
            return None;
        }

        let text = outcome.unwrap_or_else(|e| {
            warn!(error = %e, "reply task failed");
            FALLBACK_REPLY.to_string()
        });

        self.session.messages.push(ChatMessage::assistant(text));
        self.session.messages.last()
    }
}

impl Drop for DialogueController {
    fn drop(&mut self) {
        if let Some(task) = &self.pending {
            task.abort();
        }
    }
}

async fn remote_reply(completion: Arc<dyn CompletionService>, request: CompletionRequest) -> String {
    match completion.complete(&request).await {
        Ok(Some(reply)) => reply,
        Ok(None) => {
            warn!("remote assistant returned an empty reply");
            UNPROCESSABLE_REPLY.to_string()
        }
        Err(e) => {
            warn!(error = %e, "remote assistant unavailable");
            FALLBACK_REPLY.to_string()
        }
    }
}
