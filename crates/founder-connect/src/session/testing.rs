use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::{
    AuthError, AuthProvider, Credentials, Profile, ProfilePatch, SignUpRequest, User,
};

/// Provider double that accepts any credentials and can be told to fail its next call.
#[derive(Default)]
pub(crate) struct StubAuthProvider {
    users: Mutex<HashMap<String, User>>,
    current: Mutex<Option<User>>,
    failure: Mutex<Option<AuthError>>,
    passwords: Mutex<Vec<String>>,
}

impl StubAuthProvider {
    pub(crate) fn fail_next(&self, error: AuthError) {
        *self.failure.lock().expect("failure mutex poisoned") = Some(error);
    }

    /// Passwords received by sign-in and sign-up, in call order.
    pub(crate) fn received_passwords(&self) -> Vec<String> {
        self.passwords.lock().expect("passwords mutex poisoned").clone()
    }

    fn record_password(&self, credentials: &Credentials) {
        self.passwords
            .lock()
            .expect("passwords mutex poisoned")
            .push(credentials.password.clone());
    }

    fn take_failure(&self) -> Result<(), AuthError> {
        match self.failure.lock().expect("failure mutex poisoned").take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn remember(&self, user: User) -> User {
        self.users
            .lock()
            .expect("users mutex poisoned")
            .insert(user.email.clone(), user.clone());
        *self.current.lock().expect("current mutex poisoned") = Some(user.clone());
        user
    }
}

#[async_trait]
impl AuthProvider for StubAuthProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        self.record_password(credentials);
        self.take_failure()?;
        let known = self
            .users
            .lock()
            .expect("users mutex poisoned")
            .get(&credentials.email)
            .cloned();
        let user = known.unwrap_or_else(|| User {
            id: format!("user-{}", credentials.email),
            email: credentials.email.clone(),
            profile: Profile::default(),
        });
        Ok(self.remember(user))
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<User, AuthError> {
        self.record_password(&request.credentials);
        self.take_failure()?;
        let user = User {
            id: format!("user-{}", request.credentials.email),
            email: request.credentials.email.clone(),
            profile: request.profile.clone(),
        };
        Ok(self.remember(user))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
    ) -> Result<User, AuthError> {
        self.take_failure()?;
        let mut user = self
            .users
            .lock()
            .expect("users mutex poisoned")
            .values()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or(AuthError::NotAuthenticated)?;
        patch.clone().apply(&mut user.profile);
        Ok(self.remember(user))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.take_failure()?;
        *self.current.lock().expect("current mutex poisoned") = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        self.take_failure()?;
        Ok(self.current.lock().expect("current mutex poisoned").clone())
    }
}

pub(crate) fn credentials(email: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: "correct-horse".to_string(),
    }
}

pub(crate) fn sign_up_request(email: &str, full_name: &str) -> SignUpRequest {
    SignUpRequest {
        credentials: credentials(email),
        profile: Profile {
            full_name: full_name.to_string(),
            university: "Northeastern University".to_string(),
            looking_for: vec!["Technical Co-founder".to_string()],
            skills: vec!["Product Management".to_string()],
            bio: String::new(),
        },
    }
}
