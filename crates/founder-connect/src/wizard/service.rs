use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;
use tracing::{debug, info};

use super::completion::{
    JobPostingCompletion, LandingCompletion, SignInCompletion, SignUpCompletion,
};
use super::driver::{
    CompletionError, CompletionHandler, CompletionReceipt, StepOutcome, WizardDriver,
};
use super::flows::{FlowKind, WizardFlow};
use super::form::FormData;
use super::machine::{KeyPress, StepWizard, WizardError, WizardState};
use super::step::{StepInput, StepView};
use crate::config::WizardConfig;
use crate::listings::JobService;
use crate::session::{Redirect, SessionService};

/// Rendering snapshot of one wizard run. Password answers are never echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub id: String,
    pub flow: FlowKind,
    pub state: WizardState,
    pub step_index: usize,
    pub total_steps: usize,
    pub progress: f64,
    pub step: StepView,
    pub error: Option<String>,
    pub answers: FormData,
}

impl WizardView {
    pub fn of(id: &str, wizard: &StepWizard) -> Self {
        let mut answers = wizard.form().clone();
        for step in wizard.flow().steps() {
            if matches!(step.input, StepInput::Password) {
                answers.remove(step.field);
            }
        }

        Self {
            id: id.to_string(),
            flow: wizard.kind(),
            state: wizard.state(),
            step_index: wizard.current_index(),
            total_steps: wizard.flow().len(),
            progress: wizard.progress(),
            step: wizard.current_step().view(wizard.form()),
            error: wizard.error().map(str::to_string),
            answers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Moved,
    Stayed,
    Completed,
    SubmissionFailed,
}

/// Answer to a navigation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardReply {
    pub outcome: ReplyKind,
    pub wizard: WizardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<CompletionReceipt>,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardServiceError {
    #[error("wizard '{0}' not found")]
    NotFound(String),
    #[error("no completion handler is registered for the {} flow", .0.label())]
    UnsupportedFlow(FlowKind),
    #[error("you need to sign in first")]
    Unauthenticated(Redirect),
    #[error("you are already signed in")]
    AlreadySignedIn(Redirect),
    #[error(transparent)]
    Step(#[from] WizardError),
}

type SharedWizard = Arc<AsyncMutex<StepWizard>>;

struct StoredRun {
    wizard: SharedWizard,
    last_touched: Instant,
}

/// Server-held wizard runs keyed by id, each driven by its flow's completion handler.
///
/// Runs untouched for longer than the idle timeout are dropped the next time a run is
/// started or looked up.
pub struct WizardService {
    session: Arc<SessionService>,
    flows: HashMap<FlowKind, Arc<WizardFlow>>,
    drivers: HashMap<FlowKind, WizardDriver>,
    wizards: Mutex<HashMap<String, StoredRun>>,
    next_id: AtomicU64,
    idle_timeout: Duration,
}

impl WizardService {
    pub fn new(
        session: Arc<SessionService>,
        handlers: HashMap<FlowKind, Arc<dyn CompletionHandler>>,
        transition_delay: Duration,
    ) -> Self {
        let drivers = handlers
            .into_iter()
            .map(|(kind, handler)| (kind, WizardDriver::new(handler, transition_delay)))
            .collect();
        let flows = FlowKind::ALL
            .into_iter()
            .map(|kind| (kind, Arc::new(WizardFlow::for_kind(kind))))
            .collect();

        Self {
            session,
            flows,
            drivers,
            wizards: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            idle_timeout: Duration::from_secs(WizardConfig::DEFAULT_IDLE_SECS),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Registers the app's completion handler for every flow.
    pub fn with_default_handlers(
        session: Arc<SessionService>,
        jobs: Arc<JobService>,
        transition_delay: Duration,
    ) -> Self {
        let mut handlers: HashMap<FlowKind, Arc<dyn CompletionHandler>> = HashMap::new();
        handlers.insert(
            FlowKind::SignUp,
            Arc::new(SignUpCompletion::new(session.clone())),
        );
        handlers.insert(
            FlowKind::SignIn,
            Arc::new(SignInCompletion::new(session.clone())),
        );
        handlers.insert(FlowKind::Landing, Arc::new(LandingCompletion));
        handlers.insert(
            FlowKind::CreateJob,
            Arc::new(JobPostingCompletion::new(session.clone(), jobs)),
        );
        Self::new(session, handlers, transition_delay)
    }

    pub fn session(&self) -> &Arc<SessionService> {
        &self.session
    }

    /// Opens a new run of `kind`, optionally with answers carried over from another flow.
    pub async fn start(
        &self,
        kind: FlowKind,
        prefill: FormData,
    ) -> Result<WizardView, WizardServiceError> {
        if !self.drivers.contains_key(&kind) {
            return Err(WizardServiceError::UnsupportedFlow(kind));
        }
        match kind {
            FlowKind::CreateJob => {
                self.session
                    .require_user()
                    .await
                    .map_err(WizardServiceError::Unauthenticated)?;
            }
            FlowKind::SignUp | FlowKind::SignIn => {
                if let Some(redirect) = self.session.redirect_if_signed_in().await {
                    return Err(WizardServiceError::AlreadySignedIn(redirect));
                }
            }
            FlowKind::Landing => {}
        }

        let flow = self
            .flows
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Arc::new(WizardFlow::for_kind(kind)));
        let wizard = StepWizard::from_shared(flow).with_form(prefill);
        let id = format!("wiz-{:06}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let view = WizardView::of(&id, &wizard);

        let mut store = self.store();
        self.evict_idle(&mut store);
        store.insert(
            id.clone(),
            StoredRun {
                wizard: Arc::new(AsyncMutex::new(wizard)),
                last_touched: Instant::now(),
            },
        );
        drop(store);
        info!(wizard = %id, flow = kind.label(), "wizard started");
        Ok(view)
    }

    pub async fn view(&self, id: &str) -> Result<WizardView, WizardServiceError> {
        let wizard = self.lookup(id)?;
        let wizard = wizard.lock().await;
        Ok(WizardView::of(id, &wizard))
    }

    pub async fn answer(
        &self,
        id: &str,
        answers: FormData,
    ) -> Result<WizardView, WizardServiceError> {
        let wizard = self.lookup(id)?;
        let mut wizard = wizard.lock().await;
        wizard.merge_answers(answers)?;
        Ok(WizardView::of(id, &wizard))
    }

    pub async fn next(&self, id: &str) -> Result<WizardReply, WizardServiceError> {
        self.navigate(id, Navigation::Next).await
    }

    pub async fn back(&self, id: &str) -> Result<WizardReply, WizardServiceError> {
        self.navigate(id, Navigation::Back).await
    }

    pub async fn key(&self, id: &str, key: KeyPress) -> Result<WizardReply, WizardServiceError> {
        self.navigate(id, Navigation::Key(key)).await
    }

    /// Drops a run and its answers.
    pub fn abandon(&self, id: &str) -> Result<(), WizardServiceError> {
        if self.store().remove(id).is_none() {
            return Err(WizardServiceError::NotFound(id.to_string()));
        }
        info!(wizard = %id, "wizard abandoned");
        Ok(())
    }

    pub fn active(&self) -> usize {
        self.store().len()
    }

    async fn navigate(
        &self,
        id: &str,
        navigation: Navigation,
    ) -> Result<WizardReply, WizardServiceError> {
        let shared = self.lookup(id)?;
        let mut wizard = shared.lock().await;
        let kind = wizard.kind();
        let driver = self
            .drivers
            .get(&kind)
            .ok_or(WizardServiceError::UnsupportedFlow(kind))?;

        let outcome = match navigation {
            Navigation::Next => driver.next(&mut wizard).await?,
            Navigation::Back => driver.back(&mut wizard).await?,
            Navigation::Key(key) => driver.key(&mut wizard, key).await?,
        };
        let view = WizardView::of(id, &wizard);
        drop(wizard);

        match outcome {
            StepOutcome::Moved { .. } => Ok(reply(ReplyKind::Moved, view, None)),
            StepOutcome::Stayed => Ok(reply(ReplyKind::Stayed, view, None)),
            StepOutcome::Completed(receipt) => {
                self.store().remove(id);
                info!(wizard = %id, flow = kind.label(), "wizard completed");
                Ok(reply(ReplyKind::Completed, view, Some(receipt)))
            }
            StepOutcome::SubmissionFailed(CompletionError::Unauthenticated(redirect)) => {
                Err(WizardServiceError::Unauthenticated(redirect))
            }
            StepOutcome::SubmissionFailed(_) => {
                Ok(reply(ReplyKind::SubmissionFailed, view, None))
            }
        }
    }

    fn lookup(&self, id: &str) -> Result<SharedWizard, WizardServiceError> {
        let mut store = self.store();
        self.evict_idle(&mut store);
        let run = store
            .get_mut(id)
            .ok_or_else(|| WizardServiceError::NotFound(id.to_string()))?;
        run.last_touched = Instant::now();
        Ok(run.wizard.clone())
    }

    fn evict_idle(&self, store: &mut HashMap<String, StoredRun>) {
        let now = Instant::now();
        let before = store.len();
        store.retain(|_, run| now.duration_since(run.last_touched) < self.idle_timeout);
        let evicted = before - store.len();
        if evicted > 0 {
            debug!(evicted, "idle wizards discarded");
        }
    }

    fn store(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredRun>> {
        self.wizards.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy)]
enum Navigation {
    Next,
    Back,
    Key(KeyPress),
}

fn reply(
    outcome: ReplyKind,
    wizard: WizardView,
    receipt: Option<CompletionReceipt>,
) -> WizardReply {
    WizardReply {
        outcome,
        wizard,
        receipt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::seeded_job_service;
    use crate::session::testing::{sign_up_request, StubAuthProvider};
    use crate::session::{AuthError, DASHBOARD_PATH, SIGN_IN_PATH, SIGN_UP_PATH};

    fn service() -> (WizardService, Arc<StubAuthProvider>) {
        let provider = Arc::new(StubAuthProvider::default());
        let session = Arc::new(SessionService::new(provider.clone()));
        let jobs = Arc::new(seeded_job_service(10));
        (
            WizardService::with_default_handlers(session, jobs, Duration::ZERO),
            provider,
        )
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let (service, _) = service();
        let first = service
            .start(FlowKind::Landing, FormData::new())
            .await
            .expect("starts");
        let second = service
            .start(FlowKind::SignIn, FormData::new())
            .await
            .expect("starts");

        assert_eq!(first.id, "wiz-000001");
        assert_eq!(second.id, "wiz-000002");
        assert_eq!(service.active(), 2);
    }

    #[tokio::test]
    async fn landing_hands_off_to_sign_up() {
        let (service, _) = service();
        let landing = service
            .start(FlowKind::Landing, FormData::new())
            .await
            .expect("starts");

        service
            .answer(
                &landing.id,
                FormData::new().with("looking_for", vec!["A co-founder"]),
            )
            .await
            .expect("editing");
        let moved = service.next(&landing.id).await.expect("moves");
        assert_eq!(moved.outcome, ReplyKind::Moved);
        assert_eq!(moved.wizard.progress, 100.0);

        service
            .answer(
                &landing.id,
                FormData::new().with("email", "maya@northeastern.edu"),
            )
            .await
            .expect("editing");
        let done = service.next(&landing.id).await.expect("completes");
        let receipt = done.receipt.expect("receipt");
        assert_eq!(receipt.redirect, SIGN_UP_PATH);

        let sign_up = service
            .start(FlowKind::SignUp, receipt.prefill)
            .await
            .expect("starts");
        assert_eq!(sign_up.answers.text("email"), "maya@northeastern.edu");
        assert!(matches!(
            service.view(&landing.id).await,
            Err(WizardServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn incomplete_steps_surface_the_validation_message() {
        let (service, _) = service();
        let view = service
            .start(FlowKind::SignIn, FormData::new())
            .await
            .expect("starts");

        let error = service.next(&view.id).await.expect_err("email missing");
        assert_eq!(error.to_string(), "Please complete this step");
        let view = service.view(&view.id).await.expect("still open");
        assert_eq!(view.error.as_deref(), Some("Please complete this step"));
    }

    #[tokio::test]
    async fn passwords_are_not_echoed() {
        let (service, _) = service();
        let view = service
            .start(FlowKind::SignIn, FormData::new())
            .await
            .expect("starts");
        let view = service
            .answer(
                &view.id,
                FormData::new()
                    .with("email", "maya@northeastern.edu")
                    .with("password", "correct-horse"),
            )
            .await
            .expect("editing");

        assert!(view.answers.get("password").is_none());
        assert_eq!(view.answers.text("email"), "maya@northeastern.edu");
    }

    #[tokio::test]
    async fn sign_in_failure_keeps_the_wizard_open_for_retry() {
        let (service, provider) = service();
        let view = service
            .start(FlowKind::SignIn, FormData::new())
            .await
            .expect("starts");
        service
            .answer(
                &view.id,
                FormData::new()
                    .with("email", "maya@northeastern.edu")
                    .with("password", "wrong"),
            )
            .await
            .expect("editing");
        service.next(&view.id).await.expect("moves");

        provider.fail_next(AuthError::Rejected("Invalid login credentials".to_string()));
        let failed = service.next(&view.id).await.expect("submits");
        assert_eq!(failed.outcome, ReplyKind::SubmissionFailed);
        assert_eq!(
            failed.wizard.error.as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(failed.wizard.state, WizardState::Editing { step: 1 });

        let done = service
            .key(&view.id, KeyPress::Enter)
            .await
            .expect("submits again");
        assert_eq!(done.outcome, ReplyKind::Completed);
        assert_eq!(
            done.receipt.map(|receipt| receipt.redirect),
            Some(DASHBOARD_PATH.to_string())
        );
    }

    #[tokio::test]
    async fn job_wizard_needs_a_signed_in_founder() {
        let (service, _) = service();
        let error = service
            .start(FlowKind::CreateJob, FormData::new())
            .await
            .expect_err("not signed in");
        assert!(matches!(
            error,
            WizardServiceError::Unauthenticated(Redirect { ref to }) if to == SIGN_IN_PATH
        ));

        service
            .session()
            .sign_up(&sign_up_request("maya@northeastern.edu", "Maya Chen"))
            .await
            .expect("sign up succeeds");
        assert!(service
            .start(FlowKind::CreateJob, FormData::new())
            .await
            .is_ok());
        assert!(matches!(
            service.start(FlowKind::SignIn, FormData::new()).await,
            Err(WizardServiceError::AlreadySignedIn(_))
        ));
    }

    #[tokio::test]
    async fn abandoning_discards_the_run() {
        let (service, _) = service();
        let view = service
            .start(FlowKind::Landing, FormData::new())
            .await
            .expect("starts");

        service.abandon(&view.id).expect("exists");
        assert_eq!(service.active(), 0);
        assert!(matches!(
            service.abandon(&view.id),
            Err(WizardServiceError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_runs_are_discarded() {
        let (service, _) = service();
        let service = service.with_idle_timeout(Duration::from_secs(60));
        let idle = service
            .start(FlowKind::Landing, FormData::new())
            .await
            .expect("starts");
        let busy = service
            .start(FlowKind::Landing, FormData::new())
            .await
            .expect("starts");

        tokio::time::advance(Duration::from_secs(45)).await;
        service.view(&busy.id).await.expect("touched in time");
        tokio::time::advance(Duration::from_secs(30)).await;

        assert!(matches!(
            service.view(&idle.id).await,
            Err(WizardServiceError::NotFound(ref id)) if id == &idle.id
        ));
        assert!(service.view(&busy.id).await.is_ok());
        assert_eq!(service.active(), 1);
    }
}
