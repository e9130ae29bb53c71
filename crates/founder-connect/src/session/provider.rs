use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Profile fields collected by the sign-up wizard and edited on the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    pub university: String,
    #[serde(default)]
    pub looking_for: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub profile: Profile,
}

impl User {
    pub fn first_name(&self) -> &str {
        self.profile
            .full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub profile: Profile,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub university: Option<String>,
    pub looking_for: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, profile: &mut Profile) {
        if let Some(full_name) = self.full_name {
            profile.full_name = full_name;
        }
        if let Some(university) = self.university {
            profile.university = university;
        }
        if let Some(looking_for) = self.looking_for {
            profile.looking_for = looking_for;
        }
        if let Some(skills) = self.skills {
            profile.skills = skills;
        }
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The provider explained the failure; shown to the user as-is.
    #[error("{0}")]
    Rejected(String),
    #[error("{}", GENERIC_FAILURE_MESSAGE)]
    Unavailable,
    #[error("you need to sign in first")]
    NotAuthenticated,
}

impl AuthError {
    /// Wraps a provider message, falling back to the generic failure when it is blank.
    pub fn from_message(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.trim().is_empty() => Self::Rejected(message),
            _ => Self::Unavailable,
        }
    }
}

/// External authentication and profile store.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<User, AuthError>;

    async fn update_profile(&self, user_id: &str, patch: &ProfilePatch)
        -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn current_user(&self) -> Result<Option<User>, AuthError>;
}
