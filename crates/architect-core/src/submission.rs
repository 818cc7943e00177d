//! Contact form submission.
//!
//! `Idle -> Submitting -> Succeeded | Failed(message)`, and back to `Idle`
//! only through [`SubmissionController::reset`]. A submit while one is
//! already in flight is rejected before any network work is started.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::client::{IntakeOutcome, IntakeService};
use crate::task::PendingTask;

/// Shown when the intake rejects a submission without saying why.
pub const GENERIC_ERROR: &str = "Что-то пошло не так";

/// Shown when the request never completed.
pub const NETWORK_ERROR: &str = "Ошибка сети. Попробуйте снова.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("a submission is already in progress")]
    InProgress,

    #[error("the form was already sent; reset it to send another")]
    NeedsReset,
}

/// Form fields in the order the caller filled them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    fields: Vec<(String, String)>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value under the same name.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for ContactForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = ContactForm::new();
        for (name, value) in iter {
            form.set(name.as_ref(), value.as_ref());
        }
        form
    }
}

type IntakeTask = PendingTask<anyhow::Result<IntakeOutcome>>;

pub struct SubmissionController {
    form: ContactForm,
    state: SubmissionState,
    intake: Arc<dyn IntakeService>,
    generation: u64,
    pending: Option<IntakeTask>,
}

impl SubmissionController {
    pub fn new(intake: Arc<dyn IntakeService>) -> Self {
        Self {
            form: ContactForm::new(),
            state: SubmissionState::Idle,
            intake,
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    /// Send the current form in the background.
    ///
    /// Must be called from within a tokio runtime. Allowed from `Idle` and
    /// `Failed` (retry).
    pub fn submit(&mut self) -> Result<(), SubmissionError> {
        match self.state {
            SubmissionState::Submitting => {
                debug!("submit rejected: already submitting");
                return Err(SubmissionError::InProgress);
            }
            SubmissionState::Succeeded => return Err(SubmissionError::NeedsReset),
            SubmissionState::Idle | SubmissionState::Failed(_) => {}
        }

        self.state = SubmissionState::Submitting;
        self.generation += 1;

        let intake = Arc::clone(&self.intake);
        let fields = self.form.fields().to_vec();
        info!(fields = fields.len(), "submitting contact form");
        self.pending = Some(PendingTask::spawn(self.generation, async move {
            intake.submit(&fields).await
        }));
        Ok(())
    }

    /// Apply the submission result if it has arrived. Never blocks.
    pub fn poll(&mut self) -> Option<&SubmissionState> {
        let outcome = self.pending.as_mut()?.try_take()?;
        let task = self.pending.take()?;
        Some(self.finish(task.generation(), outcome))
    }

    /// Wait for the in-flight submission, if any, and return the resulting state.
    pub async fn wait(&mut self) -> &SubmissionState {
        let Some(task) = self.pending.as_mut() else {
            return &self.state;
        };
        let outcome = task.wait().await;
        let generation = task.generation();
        self.pending = None;
        self.finish(generation, outcome)
    }

    /// "Send another": back to `Idle` from `Succeeded` or `Failed`. Ignored in
    /// any other state; returns whether the reset happened.
    pub fn reset(&mut self) -> bool {
        match self.state {
            SubmissionState::Succeeded | SubmissionState::Failed(_) => {
                self.state = SubmissionState::Idle;
                true
            }
            SubmissionState::Submitting => {
                debug!("reset ignored while submitting");
                false
            }
            SubmissionState::Idle => false,
        }
    }

    fn finish(
        &mut self,
        generation: u64,
        outcome: Result<anyhow::Result<IntakeOutcome>, JoinError>,
    ) -> &SubmissionState {
        if generation != self.generation || self.state != SubmissionState::Submitting {
            debug!(generation, current = self.generation, "discarding stale submission result");
            return &self.state;
        }

        self.state = match outcome {
            Ok(Ok(IntakeOutcome { success: true, .. })) => {
                info!("contact form accepted");
                self.form.clear();
                SubmissionState::Succeeded
            }
            Ok(Ok(IntakeOutcome { message, .. })) => {
                let message = message.unwrap_or_else(|| GENERIC_ERROR.to_string());
                info!(%message, "contact form rejected");
                SubmissionState::Failed(message)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "intake request failed");
                SubmissionState::Failed(NETWORK_ERROR.to_string())
            }
            Err(e) => {
                warn!(error = %e, "intake task failed");
                SubmissionState::Failed(NETWORK_ERROR.to_string())
            }
        };
        &self.state
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        if let Some(task) = &self.pending {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    enum Behavior {
        Respond(bool, Option<&'static str>),
        Unreachable,
    }

    struct FakeIntake {
        behavior: Behavior,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
        received: Mutex<Vec<(String, String)>>,
    }

    impl FakeIntake {
        fn new(behavior: Behavior) -> Arc<Self> {
            Self::build(behavior, None)
        }

        fn gated(behavior: Behavior, gate: Arc<Notify>) -> Arc<Self> {
            Self::build(behavior, Some(gate))
        }

        fn build(behavior: Behavior, gate: Option<Arc<Notify>>) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                gate,
                calls: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl IntakeService for FakeIntake {
        async fn submit(&self, fields: &[(String, String)]) -> Result<IntakeOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.received.lock().unwrap() = fields.to_vec();
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.behavior {
                Behavior::Respond(success, message) => Ok(IntakeOutcome {
                    success,
                    message: message.map(str::to_string),
                }),
                Behavior::Unreachable => Err(anyhow!("dns error")),
            }
        }
    }

    fn filled(intake: Arc<FakeIntake>) -> SubmissionController {
        let mut controller = SubmissionController::new(intake);
        controller.form_mut().set("name", "Иван");
        controller.form_mut().set("email", "i@x.com");
        controller
    }

    #[tokio::test]
    async fn test_accepted_submission_succeeds_and_clears_form() {
        let intake = FakeIntake::new(Behavior::Respond(true, None));
        let mut controller = filled(intake.clone());

        controller.submit().unwrap();
        assert_eq!(controller.state(), &SubmissionState::Submitting);

        assert_eq!(controller.wait().await, &SubmissionState::Succeeded);
        assert!(controller.form().is_empty());
        assert_eq!(controller.error_message(), None);
        assert_eq!(
            *intake.received.lock().unwrap(),
            vec![
                ("name".to_string(), "Иван".to_string()),
                ("email".to_string(), "i@x.com".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_server_message() {
        let intake = FakeIntake::new(Behavior::Respond(false, Some("Invalid email")));
        let mut controller = filled(intake);

        controller.submit().unwrap();
        assert_eq!(
            controller.wait().await,
            &SubmissionState::Failed("Invalid email".to_string())
        );
        assert_eq!(controller.form().get("name"), Some("Иван"));
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_default() {
        let mut controller = filled(FakeIntake::new(Behavior::Respond(false, None)));

        controller.submit().unwrap();
        controller.wait().await;
        assert_eq!(controller.error_message(), Some(GENERIC_ERROR));
    }

    #[tokio::test]
    async fn test_unreachable_intake_reports_network_error() {
        let mut controller = filled(FakeIntake::new(Behavior::Unreachable));

        controller.submit().unwrap();
        controller.wait().await;
        assert_eq!(controller.error_message(), Some(NETWORK_ERROR));
    }

    #[tokio::test]
    async fn test_double_submit_makes_one_call() {
        let gate = Arc::new(Notify::new());
        let intake = FakeIntake::gated(Behavior::Respond(true, None), gate.clone());
        let mut controller = filled(intake.clone());

        controller.submit().unwrap();
        assert_eq!(controller.submit(), Err(SubmissionError::InProgress));
        assert_eq!(controller.state(), &SubmissionState::Submitting);

        gate.notify_one();
        assert_eq!(controller.wait().await, &SubmissionState::Succeeded);
        assert_eq!(intake.calls(), 1);
    }

    #[tokio::test]
    async fn test_reset_ignored_while_submitting() {
        let gate = Arc::new(Notify::new());
        let mut controller = filled(FakeIntake::gated(Behavior::Respond(true, None), gate.clone()));

        controller.submit().unwrap();
        assert!(!controller.reset());
        assert!(controller.is_submitting());

        gate.notify_one();
        assert_eq!(controller.wait().await, &SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle_from_terminal_states() {
        let mut controller = filled(FakeIntake::new(Behavior::Respond(false, Some("nope"))));
        assert!(!controller.reset());

        controller.submit().unwrap();
        controller.wait().await;
        assert!(controller.reset());
        assert_eq!(controller.state(), &SubmissionState::Idle);
        assert_eq!(controller.error_message(), None);

        let mut controller = filled(FakeIntake::new(Behavior::Respond(true, None)));
        controller.submit().unwrap();
        controller.wait().await;
        assert_eq!(controller.submit(), Err(SubmissionError::NeedsReset));
        assert!(controller.reset());
        assert_eq!(controller.state(), &SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let intake = FakeIntake::new(Behavior::Respond(false, Some("Try later")));
        let mut controller = filled(intake.clone());

        controller.submit().unwrap();
        controller.wait().await;
        controller.submit().unwrap();
        assert!(controller.is_submitting());
        controller.wait().await;
        assert_eq!(intake.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_values_are_submitted_as_is() {
        let intake = FakeIntake::new(Behavior::Respond(true, None));
        let mut controller = SubmissionController::new(intake.clone());
        controller.form_mut().set("name", "");
        controller.form_mut().set("message", "");

        controller.submit().unwrap();
        assert_eq!(controller.wait().await, &SubmissionState::Succeeded);
        assert_eq!(intake.received.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_poll_is_none_until_response() {
        let gate = Arc::new(Notify::new());
        let mut controller = filled(FakeIntake::gated(Behavior::Respond(true, None), gate.clone()));

        assert!(controller.poll().is_none());
        controller.submit().unwrap();
        assert!(controller.poll().is_none());

        gate.notify_one();
        let mut state = None;
        for _ in 0..1000 {
            if let Some(s) = controller.poll() {
                state = Some(s.clone());
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(state, Some(SubmissionState::Succeeded));
    }

    #[tokio::test]
    async fn test_wait_without_submission_returns_current_state() {
        let mut controller = filled(FakeIntake::new(Behavior::Respond(true, None)));
        assert_eq!(controller.wait().await, &SubmissionState::Idle);
    }

    #[test]
    fn test_contact_form_set_replaces_existing_field() {
        let mut form: ContactForm = [("name", "Иван"), ("email", "i@x.com")].into_iter().collect();
        form.set("name", "Пётр");
        assert_eq!(form.get("name"), Some("Пётр"));
        assert_eq!(form.fields().len(), 2);
        assert_eq!(form.fields()[0].0, "name");
    }
}
