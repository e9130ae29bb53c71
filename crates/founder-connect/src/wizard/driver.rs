use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::form::FormData;
use super::machine::{Advance, KeyAction, KeyPress, StepWizard, WizardError, WizardState};
use crate::session::{AuthError, Redirect, GENERIC_FAILURE_MESSAGE};

/// What a flow does with its answers once the final step is submitted.
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    async fn complete(&self, form: &FormData) -> Result<CompletionReceipt, CompletionError>;
}

/// Successful completion: where to go next, plus answers to carry into the next flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReceipt {
    pub redirect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "FormData::is_empty")]
    pub prefill: FormData,
}

impl CompletionReceipt {
    pub fn redirect(to: impl Into<String>) -> Self {
        Self {
            redirect: to.into(),
            message: None,
            prefill: FormData::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_prefill(mut self, prefill: FormData) -> Self {
        self.prefill = prefill;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("{0}")]
    Rejected(String),
    #[error("{}", GENERIC_FAILURE_MESSAGE)]
    Unavailable,
    #[error("you need to sign in first")]
    Unauthenticated(Redirect),
}

impl CompletionError {
    /// Message stored on the wizard; `None` selects the generic fallback.
    fn wizard_message(&self) -> Option<String> {
        match self {
            CompletionError::Unavailable => None,
            CompletionError::Rejected(_) | CompletionError::Unauthenticated(_) => {
                Some(self.to_string())
            }
        }
    }
}

impl From<AuthError> for CompletionError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Rejected(message) => Self::Rejected(message),
            AuthError::Unavailable => Self::Unavailable,
            AuthError::NotAuthenticated => {
                Self::Unauthenticated(Redirect::to(crate::session::SIGN_IN_PATH))
            }
        }
    }
}

/// Result of one navigation request that was accepted by the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { to: usize },
    Stayed,
    Completed(CompletionReceipt),
    SubmissionFailed(CompletionError),
}

/// Runs wizard navigation end to end: waits out transitions and calls the completion handler.
///
/// Navigation futures are cancel-safe. Dropping one mid-delay or mid-submit leaves the
/// wizard editable instead of stuck in `Transitioning` or `Submitting`.
#[derive(Clone)]
pub struct WizardDriver {
    handler: Arc<dyn CompletionHandler>,
    transition_delay: Duration,
}

impl WizardDriver {
    pub fn new(handler: Arc<dyn CompletionHandler>, transition_delay: Duration) -> Self {
        Self {
            handler,
            transition_delay,
        }
    }

    pub fn transition_delay(&self) -> Duration {
        self.transition_delay
    }

    pub async fn next(&self, wizard: &mut StepWizard) -> Result<StepOutcome, WizardError> {
        match wizard.go_next()? {
            Advance::Transition(_) => self.settle(wizard).await,
            Advance::ReadyToSubmit => self.submit(wizard).await,
        }
    }

    pub async fn back(&self, wizard: &mut StepWizard) -> Result<StepOutcome, WizardError> {
        match wizard.go_back()? {
            Some(_) => self.settle(wizard).await,
            None => Ok(StepOutcome::Stayed),
        }
    }

    pub async fn key(
        &self,
        wizard: &mut StepWizard,
        key: KeyPress,
    ) -> Result<StepOutcome, WizardError> {
        match wizard.handle_key(key)? {
            KeyAction::Next(Advance::Transition(_)) | KeyAction::Back(_) => {
                self.settle(wizard).await
            }
            KeyAction::Next(Advance::ReadyToSubmit) => self.submit(wizard).await,
            KeyAction::Ignored => Ok(StepOutcome::Stayed),
        }
    }

    async fn settle(&self, wizard: &mut StepWizard) -> Result<StepOutcome, WizardError> {
        let mut pending = Unsettled { wizard };
        if !self.transition_delay.is_zero() {
            tokio::time::sleep(self.transition_delay).await;
        }
        let to = pending.wizard.finish_transition()?;
        debug!(flow = pending.wizard.kind().label(), step = to, "wizard step changed");
        Ok(StepOutcome::Moved { to })
    }

    async fn submit(&self, wizard: &mut StepWizard) -> Result<StepOutcome, WizardError> {
        let mut pending = Unsettled { wizard };
        let form = pending.wizard.begin_submit()?.clone();
        match self.handler.complete(&form).await {
            Ok(receipt) => {
                pending.wizard.submission_succeeded();
                debug!(
                    flow = pending.wizard.kind().label(),
                    redirect = %receipt.redirect,
                    "wizard completed"
                );
                Ok(StepOutcome::Completed(receipt))
            }
            Err(error) => {
                warn!(flow = pending.wizard.kind().label(), %error, "wizard submission failed");
                pending.wizard.submission_failed(error.wizard_message());
                Ok(StepOutcome::SubmissionFailed(error))
            }
        }
    }
}

/// Settles a wizard left mid-transition or mid-submit when the driving future is dropped:
/// a transition lands on its target step and a submission reports the generic failure.
struct Unsettled<'a> {
    wizard: &'a mut StepWizard,
}

impl Drop for Unsettled<'_> {
    fn drop(&mut self) {
        match self.wizard.state() {
            WizardState::Transitioning { .. } => {
                let _ = self.wizard.finish_transition();
            }
            WizardState::Submitting => self.wizard.submission_failed(None),
            WizardState::Editing { .. } | WizardState::Complete => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::wizard::flows::WizardFlow;
    use crate::wizard::machine::WizardState;

    #[derive(Default)]
    struct RecordingHandler {
        submissions: Mutex<Vec<FormData>>,
        failures: Mutex<Vec<CompletionError>>,
    }

    #[async_trait]
    impl CompletionHandler for RecordingHandler {
        async fn complete(&self, form: &FormData) -> Result<CompletionReceipt, CompletionError> {
            self.submissions
                .lock()
                .expect("submissions mutex poisoned")
                .push(form.clone());
            match self.failures.lock().expect("failures mutex poisoned").pop() {
                Some(error) => Err(error),
                None => Ok(CompletionReceipt::redirect("/dashboard")),
            }
        }
    }

    fn sign_in_wizard() -> StepWizard {
        StepWizard::new(WizardFlow::sign_in())
    }

    #[tokio::test(start_paused = true)]
    async fn transitions_wait_for_the_configured_delay() {
        let driver = WizardDriver::new(
            Arc::new(RecordingHandler::default()),
            Duration::from_millis(300),
        );
        let mut wizard = sign_in_wizard();
        wizard
            .set_field("email", "maya@northeastern.edu")
            .expect("editing");

        let started = tokio::time::Instant::now();
        let outcome = driver.next(&mut wizard).await.expect("valid step");

        assert_eq!(outcome, StepOutcome::Moved { to: 1 });
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(wizard.state(), WizardState::Editing { step: 1 });
    }

    #[tokio::test]
    async fn incomplete_step_is_reported_without_moving() {
        let driver = WizardDriver::new(Arc::new(RecordingHandler::default()), Duration::ZERO);
        let mut wizard = sign_in_wizard();

        let error = driver.next(&mut wizard).await.expect_err("email missing");
        assert!(matches!(error, WizardError::Incomplete { step: "email" }));
        assert_eq!(wizard.current_index(), 0);
    }

    #[tokio::test]
    async fn final_step_invokes_completion_handler() {
        let handler = Arc::new(RecordingHandler::default());
        let driver = WizardDriver::new(handler.clone(), Duration::ZERO);
        let mut wizard = sign_in_wizard();
        wizard
            .set_field("email", "maya@northeastern.edu")
            .expect("editing");
        driver.next(&mut wizard).await.expect("moves");
        wizard.set_field("password", "correct-horse").expect("editing");

        let outcome = driver
            .key(&mut wizard, KeyPress::Enter)
            .await
            .expect("submits");

        assert_eq!(
            outcome,
            StepOutcome::Completed(CompletionReceipt::redirect("/dashboard"))
        );
        assert!(wizard.is_complete());
        let submissions = handler.submissions.lock().expect("poisoned");
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].text("email"), "maya@northeastern.edu");
    }

    #[tokio::test]
    async fn handler_failure_allows_retry() {
        let handler = Arc::new(RecordingHandler::default());
        handler
            .failures
            .lock()
            .expect("poisoned")
            .push(CompletionError::Unavailable);
        let driver = WizardDriver::new(handler.clone(), Duration::ZERO);
        let mut wizard = sign_in_wizard();
        wizard
            .set_field("email", "maya@northeastern.edu")
            .expect("editing");
        driver.next(&mut wizard).await.expect("moves");
        wizard.set_field("password", "correct-horse").expect("editing");

        let outcome = driver.next(&mut wizard).await.expect("submits");
        assert_eq!(
            outcome,
            StepOutcome::SubmissionFailed(CompletionError::Unavailable)
        );
        assert_eq!(wizard.state(), WizardState::Editing { step: 1 });
        assert_eq!(wizard.error(), Some(GENERIC_FAILURE_MESSAGE));

        let retried = driver.next(&mut wizard).await.expect("submits again");
        assert!(matches!(retried, StepOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn back_on_first_step_stays_put() {
        let driver = WizardDriver::new(Arc::new(RecordingHandler::default()), Duration::ZERO);
        let mut wizard = StepWizard::new(WizardFlow::sign_up());

        assert_eq!(
            driver.back(&mut wizard).await.expect("editing"),
            StepOutcome::Stayed
        );
        assert_eq!(
            driver
                .key(&mut wizard, KeyPress::Escape)
                .await
                .expect("editing"),
            StepOutcome::Stayed
        );
    }

    struct StalledHandler;

    #[async_trait]
    impl CompletionHandler for StalledHandler {
        async fn complete(&self, _form: &FormData) -> Result<CompletionReceipt, CompletionError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_transition_still_lands_on_the_next_step() {
        let driver = WizardDriver::new(
            Arc::new(RecordingHandler::default()),
            Duration::from_millis(300),
        );
        let mut wizard = sign_in_wizard();
        wizard
            .set_field("email", "maya@northeastern.edu")
            .expect("editing");

        let cancelled =
            tokio::time::timeout(Duration::from_millis(100), driver.next(&mut wizard)).await;

        assert!(cancelled.is_err());
        assert_eq!(wizard.state(), WizardState::Editing { step: 1 });
        wizard.set_field("password", "correct-horse").expect("editable");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_submission_reopens_the_last_step() {
        let driver = WizardDriver::new(Arc::new(StalledHandler), Duration::ZERO);
        let mut wizard = sign_in_wizard();
        wizard
            .set_field("email", "maya@northeastern.edu")
            .expect("editing");
        driver.next(&mut wizard).await.expect("moves");
        wizard.set_field("password", "correct-horse").expect("editing");

        let cancelled =
            tokio::time::timeout(Duration::from_secs(5), driver.next(&mut wizard)).await;

        assert!(cancelled.is_err());
        assert_eq!(wizard.state(), WizardState::Editing { step: 1 });
        assert_eq!(wizard.error(), Some(GENERIC_FAILURE_MESSAGE));
    }
}
