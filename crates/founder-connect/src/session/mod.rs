//! Signed-in user state on top of the external auth and profile provider.

mod provider;
mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use provider::{
    AuthError, AuthProvider, Credentials, Profile, ProfilePatch, SignUpRequest, User,
    GENERIC_FAILURE_MESSAGE,
};
pub use service::{
    Redirect, SessionService, SessionState, DASHBOARD_PATH, SIGN_IN_PATH, SIGN_UP_PATH,
};
