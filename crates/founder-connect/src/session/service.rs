use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{info, warn};

use super::provider::{AuthError, AuthProvider, Credentials, ProfilePatch, SignUpRequest, User};

pub const SIGN_IN_PATH: &str = "/signin";
pub const SIGN_UP_PATH: &str = "/signup";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Where the client should navigate instead of the requested page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
}

impl Redirect {
    pub fn to(path: impl Into<String>) -> Self {
        Self { to: path.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready(Option<User>),
}

/// Signed-in user state over an [`AuthProvider`]. Failed provider calls leave the state as it
/// was.
pub struct SessionService {
    provider: Arc<dyn AuthProvider>,
    state: RwLock<SessionState>,
}

impl SessionService {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            state: RwLock::new(SessionState::Uninitialized),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        match self.state() {
            SessionState::Ready(user) => user,
            SessionState::Uninitialized | SessionState::Loading => None,
        }
    }

    /// Loads the current user from the provider once; later calls reuse the ready state.
    pub async fn initialize(&self) -> Result<Option<User>, AuthError> {
        let previous = self.state();
        if let SessionState::Ready(user) = previous {
            return Ok(user);
        }

        self.replace(SessionState::Loading);
        match self.provider.current_user().await {
            Ok(user) => {
                self.replace(SessionState::Ready(user.clone()));
                Ok(user)
            }
            Err(error) => {
                warn!(%error, "failed to load the current user");
                self.replace(previous);
                Err(error)
            }
        }
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let user = self.provider.sign_in(credentials).await?;
        info!(user = %user.id, "signed in");
        self.replace(SessionState::Ready(Some(user.clone())));
        Ok(user)
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User, AuthError> {
        let user = self.provider.sign_up(request).await?;
        info!(user = %user.id, university = %user.profile.university, "account created");
        self.replace(SessionState::Ready(Some(user.clone())));
        Ok(user)
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<User, AuthError> {
        let current = self.user().ok_or(AuthError::NotAuthenticated)?;
        let user = self.provider.update_profile(&current.id, patch).await?;
        info!(user = %user.id, "profile updated");
        self.replace(SessionState::Ready(Some(user.clone())));
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        info!("signed out");
        self.replace(SessionState::Ready(None));
        Ok(())
    }

    /// Guard for protected pages: the signed-in user, or a redirect to the sign-in page.
    pub async fn require_user(&self) -> Result<User, Redirect> {
        match self.initialize().await {
            Ok(Some(user)) => Ok(user),
            Ok(None) | Err(_) => Err(Redirect::to(SIGN_IN_PATH)),
        }
    }

    /// Guard for the sign-in and sign-up pages: signed-in users go to the dashboard.
    pub async fn redirect_if_signed_in(&self) -> Option<Redirect> {
        match self.initialize().await {
            Ok(Some(_)) => Some(Redirect::to(DASHBOARD_PATH)),
            Ok(None) | Err(_) => None,
        }
    }

    fn replace(&self, next: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{credentials, sign_up_request, StubAuthProvider};

    #[tokio::test]
    async fn initialize_moves_to_ready_without_user() {
        let service = SessionService::new(Arc::new(StubAuthProvider::default()));
        assert_eq!(service.state(), SessionState::Uninitialized);

        assert_eq!(service.initialize().await, Ok(None));
        assert_eq!(service.state(), SessionState::Ready(None));
    }

    #[tokio::test]
    async fn failed_initialize_restores_previous_state() {
        let provider = StubAuthProvider::default();
        provider.fail_next(AuthError::Unavailable);
        let service = SessionService::new(Arc::new(provider));

        assert_eq!(service.initialize().await, Err(AuthError::Unavailable));
        assert_eq!(service.state(), SessionState::Uninitialized);
    }

    #[tokio::test]
    async fn sign_up_then_sign_out() {
        let service = SessionService::new(Arc::new(StubAuthProvider::default()));

        let user = service
            .sign_up(&sign_up_request("maya@northeastern.edu", "Maya Chen"))
            .await
            .expect("sign up succeeds");
        assert_eq!(user.first_name(), "Maya");
        assert_eq!(service.user(), Some(user));
        assert_eq!(
            service.redirect_if_signed_in().await,
            Some(Redirect::to(DASHBOARD_PATH))
        );

        service.sign_out().await.expect("sign out succeeds");
        assert_eq!(service.state(), SessionState::Ready(None));
    }

    #[tokio::test]
    async fn rejected_sign_in_keeps_state_and_message() {
        let provider = Arc::new(StubAuthProvider::default());
        let service = SessionService::new(provider.clone());
        service.initialize().await.expect("loads");

        provider.fail_next(AuthError::Rejected("Invalid login credentials".to_string()));
        let error = service
            .sign_in(&credentials("maya@northeastern.edu"))
            .await
            .expect_err("provider rejects");

        assert_eq!(error.to_string(), "Invalid login credentials");
        assert_eq!(service.state(), SessionState::Ready(None));
    }

    #[tokio::test]
    async fn protected_pages_redirect_to_sign_in() {
        let service = SessionService::new(Arc::new(StubAuthProvider::default()));
        assert_eq!(
            service.require_user().await,
            Err(Redirect::to(SIGN_IN_PATH))
        );

        service
            .sign_in(&credentials("maya@northeastern.edu"))
            .await
            .expect("sign in succeeds");
        let user = service.require_user().await.expect("signed in");
        assert_eq!(user.email, "maya@northeastern.edu");
    }

    #[tokio::test]
    async fn profile_updates_require_a_user() {
        let service = SessionService::new(Arc::new(StubAuthProvider::default()));
        let patch = ProfilePatch {
            bio: Some("Looking for a technical co-founder in climate.".to_string()),
            ..ProfilePatch::default()
        };

        assert_eq!(
            service.update_profile(&patch).await,
            Err(AuthError::NotAuthenticated)
        );

        service
            .sign_up(&sign_up_request("maya@northeastern.edu", "Maya Chen"))
            .await
            .expect("sign up succeeds");
        let updated = service.update_profile(&patch).await.expect("updates");
        assert_eq!(
            updated.profile.bio,
            "Looking for a technical co-founder in climate."
        );
        assert_eq!(service.user(), Some(updated));
    }
}
