use async_trait::async_trait;
use founder_connect::config::{AppConfig, WizardConfig};
use founder_connect::listings::{
    seeded_founder_service, seeded_job_service, FounderService, JobService,
};
use founder_connect::matching::{default_vocabulary, SkillVocabulary};
use founder_connect::session::{
    AuthError, AuthProvider, Credentials, ProfilePatch, SessionService, SignUpRequest, User,
};
use founder_connect::wizard::WizardService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything the HTTP routes and CLI commands share.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) session: Arc<SessionService>,
    pub(crate) jobs: Arc<JobService>,
    pub(crate) founders: Arc<FounderService>,
    pub(crate) wizards: Arc<WizardService>,
    pub(crate) vocabulary: Arc<SkillVocabulary>,
}

impl Services {
    pub(crate) fn seeded(items_per_page: usize, transition_delay: Duration) -> Self {
        Self::assemble(
            items_per_page,
            transition_delay,
            WizardConfig::default().idle_timeout(),
        )
    }

    /// Services for the HTTP server. Requests complete wizard transitions immediately; the
    /// visual delay is the client's concern.
    ///
    /// There is a single process-wide [`SessionService`]: a sign-in by any HTTP client is
    /// seen by every other client, including the signed-in guard on the `create-job`
    /// wizard. This is a demo backend, not per-client sessions.
    pub(crate) fn for_server(config: &AppConfig) -> Self {
        Self::assemble(
            config.listings.items_per_page,
            Duration::ZERO,
            config.wizard.idle_timeout(),
        )
    }

    fn assemble(items_per_page: usize, transition_delay: Duration, idle_timeout: Duration) -> Self {
        let session = Arc::new(SessionService::new(Arc::new(
            InMemoryAuthProvider::default(),
        )));
        let jobs = Arc::new(seeded_job_service(items_per_page));
        let founders = Arc::new(seeded_founder_service(items_per_page));
        let wizards = Arc::new(WizardService::with_default_handlers(
            session.clone(),
            jobs.clone(),
            transition_delay,
        )
        .with_idle_timeout(idle_timeout));

        Self {
            session,
            jobs,
            founders,
            wizards,
            vocabulary: Arc::new(default_vocabulary()),
        }
    }
}

struct Account {
    password: String,
    user: User,
}

/// Process-local stand-in for the hosted auth and profile store.
#[derive(Default)]
pub(crate) struct InMemoryAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<String>>,
    next_id: AtomicU64,
}

const MIN_PASSWORD_LENGTH: usize = 8;

impl InMemoryAuthProvider {
    fn accounts(&self) -> Result<MutexGuard<'_, HashMap<String, Account>>, AuthError> {
        self.accounts.lock().map_err(|_| AuthError::Unavailable)
    }

    fn set_current(&self, email: Option<String>) -> Result<(), AuthError> {
        *self.current.lock().map_err(|_| AuthError::Unavailable)? = email;
        Ok(())
    }

    fn current_email(&self) -> Result<Option<String>, AuthError> {
        Ok(self
            .current
            .lock()
            .map_err(|_| AuthError::Unavailable)?
            .clone())
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let email = credentials.email.trim().to_ascii_lowercase();
        let user = {
            let accounts = self.accounts()?;
            match accounts.get(&email) {
                Some(account) if account.password == credentials.password => account.user.clone(),
                _ => return Err(AuthError::Rejected("Invalid login credentials".to_string())),
            }
        };
        self.set_current(Some(email))?;
        Ok(user)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<User, AuthError> {
        if request.credentials.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Rejected(format!(
                "Password should be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let email = request.credentials.email.trim().to_ascii_lowercase();
        let user = {
            let mut accounts = self.accounts()?;
            if accounts.contains_key(&email) {
                return Err(AuthError::Rejected("User already registered".to_string()));
            }
            let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            let user = User {
                id: format!("user-{id:04}"),
                email: email.clone(),
                profile: request.profile.clone(),
            };
            accounts.insert(
                email.clone(),
                Account {
                    password: request.credentials.password.clone(),
                    user: user.clone(),
                },
            );
            user
        };
        self.set_current(Some(email))?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
    ) -> Result<User, AuthError> {
        let mut accounts = self.accounts()?;
        let account = accounts
            .values_mut()
            .find(|account| account.user.id == user_id)
            .ok_or(AuthError::NotAuthenticated)?;
        patch.clone().apply(&mut account.user.profile);
        Ok(account.user.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None)
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        let Some(email) = self.current_email()? else {
            return Ok(None);
        };
        Ok(self
            .accounts()?
            .get(&email)
            .map(|account| account.user.clone()))
    }
}
