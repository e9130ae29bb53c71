use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tracing::info;

use super::driver::{CompletionError, CompletionHandler, CompletionReceipt};
use super::form::FormData;
use crate::listings::{Job, JobId, JobService, ListingServiceError, RepositoryError};
use crate::session::{
    Credentials, Profile, SessionService, SignUpRequest, DASHBOARD_PATH, SIGN_UP_PATH,
};

/// Creates the account from the sign-up answers and signs the user in.
pub struct SignUpCompletion {
    session: Arc<SessionService>,
}

impl SignUpCompletion {
    pub fn new(session: Arc<SessionService>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CompletionHandler for SignUpCompletion {
    async fn complete(&self, form: &FormData) -> Result<CompletionReceipt, CompletionError> {
        let request = SignUpRequest {
            credentials: credentials(form),
            profile: Profile {
                full_name: form.text("full_name").to_string(),
                university: form.text("university").to_string(),
                looking_for: form.list("looking_for").to_vec(),
                skills: form.list("skills").to_vec(),
                bio: form.text("bio").to_string(),
            },
        };
        let user = self.session.sign_up(&request).await?;
        Ok(CompletionReceipt::redirect(DASHBOARD_PATH)
            .with_message(format!("Welcome to FounderConnect, {}!", user.first_name())))
    }
}

pub struct SignInCompletion {
    session: Arc<SessionService>,
}

impl SignInCompletion {
    pub fn new(session: Arc<SessionService>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CompletionHandler for SignInCompletion {
    async fn complete(&self, form: &FormData) -> Result<CompletionReceipt, CompletionError> {
        let user = self.session.sign_in(&credentials(form)).await?;
        Ok(CompletionReceipt::redirect(DASHBOARD_PATH)
            .with_message(format!("Welcome back, {}!", user.first_name())))
    }
}

/// Sends landing-page visitors to sign-up with their email already filled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct LandingCompletion;

#[async_trait]
impl CompletionHandler for LandingCompletion {
    async fn complete(&self, form: &FormData) -> Result<CompletionReceipt, CompletionError> {
        let prefill = FormData::new().with("email", form.text("email"));
        Ok(CompletionReceipt::redirect(SIGN_UP_PATH).with_prefill(prefill))
    }
}

/// Publishes the job described by the posting wizard on behalf of the signed-in founder.
pub struct JobPostingCompletion {
    session: Arc<SessionService>,
    jobs: Arc<JobService>,
}

impl JobPostingCompletion {
    pub fn new(session: Arc<SessionService>, jobs: Arc<JobService>) -> Self {
        Self { session, jobs }
    }
}

#[async_trait]
impl CompletionHandler for JobPostingCompletion {
    async fn complete(&self, form: &FormData) -> Result<CompletionReceipt, CompletionError> {
        let user = self
            .session
            .require_user()
            .await
            .map_err(CompletionError::Unauthenticated)?;

        let job = Job {
            id: JobId(String::new()),
            title: form.text("title").to_string(),
            company: form.text("company").to_string(),
            description: form.text("description").to_string(),
            location: form.text("location").to_string(),
            job_type: form.text("job_type").to_string(),
            stage: form.text("stage").to_string(),
            compensation: form.text("compensation").to_string(),
            skills: form.list("skills").to_vec(),
            posted_on: Local::now().date_naive(),
            is_bookmarked: false,
        };
        let stored = self.jobs.publish_new(job).map_err(publish_error)?;
        info!(job = %stored.id.0, posted_by = %user.id, "job posting created");

        Ok(CompletionReceipt::redirect(format!("/jobs/{}", stored.id.0))
            .with_message(format!("{} is now live.", stored.title)))
    }
}

fn credentials(form: &FormData) -> Credentials {
    Credentials {
        email: form.text("email").to_string(),
        password: form.raw_text("password").to_string(),
    }
}

fn publish_error(error: ListingServiceError) -> CompletionError {
    match error {
        ListingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            CompletionError::Unavailable
        }
        other => CompletionError::Rejected(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::seeded_job_service;
    use crate::session::testing::{sign_up_request, StubAuthProvider};
    use crate::session::{AuthError, Redirect, SIGN_IN_PATH};

    fn session() -> (Arc<SessionService>, Arc<StubAuthProvider>) {
        let provider = Arc::new(StubAuthProvider::default());
        (Arc::new(SessionService::new(provider.clone())), provider)
    }

    fn job_answers() -> FormData {
        FormData::new()
            .with("title", "Founding iOS Engineer")
            .with("company", "Campus Eats")
            .with("job_type", "Part-time")
            .with("location", "Boston, MA")
            .with("stage", "MVP")
            .with("skills", vec!["Swift".to_string(), "iOS".to_string()])
            .with(
                "description",
                "Own the iOS app end to end and ship weekly to 3,000 students.",
            )
            .with("compensation", "Equity")
    }

    #[tokio::test]
    async fn sign_up_answers_become_a_profile() {
        let (session, _) = session();
        let handler = SignUpCompletion::new(session.clone());
        let form = FormData::new()
            .with("full_name", "Maya Chen")
            .with("email", "maya@northeastern.edu")
            .with("password", "correct-horse")
            .with("university", "Northeastern University")
            .with("looking_for", vec!["Find a co-founder".to_string()])
            .with("skills", vec!["React".to_string()]);

        let receipt = handler.complete(&form).await.expect("sign up succeeds");

        assert_eq!(receipt.redirect, DASHBOARD_PATH);
        assert_eq!(
            receipt.message.as_deref(),
            Some("Welcome to FounderConnect, Maya!")
        );
        let user = session.user().expect("signed in");
        assert_eq!(user.profile.university, "Northeastern University");
        assert_eq!(user.profile.skills, vec!["React".to_string()]);
    }

    #[tokio::test]
    async fn provider_messages_are_passed_through() {
        let (session, provider) = session();
        provider.fail_next(AuthError::Rejected("User already registered".to_string()));
        let handler = SignUpCompletion::new(session);

        let error = handler
            .complete(&FormData::new().with("email", "maya@northeastern.edu"))
            .await
            .expect_err("provider rejects");
        assert_eq!(
            error,
            CompletionError::Rejected("User already registered".to_string())
        );
    }

    #[tokio::test]
    async fn landing_carries_the_email_to_sign_up() {
        let form = FormData::new()
            .with("looking_for", vec!["A co-founder".to_string()])
            .with("email", "maya@northeastern.edu");

        let receipt = LandingCompletion.complete(&form).await.expect("always succeeds");

        assert_eq!(receipt.redirect, SIGN_UP_PATH);
        assert_eq!(receipt.prefill.text("email"), "maya@northeastern.edu");
        assert!(receipt.prefill.get("looking_for").is_none());
    }

    #[tokio::test]
    async fn job_posting_requires_a_signed_in_user() {
        let (session, _) = session();
        let jobs = Arc::new(seeded_job_service(10));
        let handler = JobPostingCompletion::new(session, jobs.clone());

        let error = handler
            .complete(&job_answers())
            .await
            .expect_err("nobody signed in");

        assert_eq!(
            error,
            CompletionError::Unauthenticated(Redirect::to(SIGN_IN_PATH))
        );
        assert_eq!(jobs.total().expect("count"), 12);
    }

    #[tokio::test]
    async fn job_posting_publishes_the_next_job() {
        let (session, _) = session();
        session
            .sign_up(&sign_up_request("maya@northeastern.edu", "Maya Chen"))
            .await
            .expect("sign up succeeds");
        let jobs = Arc::new(seeded_job_service(10));
        let handler = JobPostingCompletion::new(session, jobs.clone());

        let receipt = handler.complete(&job_answers()).await.expect("publishes");

        assert_eq!(receipt.redirect, "/jobs/job-013");
        let job = jobs.get("job-013").expect("stored");
        assert_eq!(job.title, "Founding iOS Engineer");
        assert_eq!(job.skills, vec!["Swift".to_string(), "iOS".to_string()]);
        assert_eq!(jobs.total().expect("count"), 13);
    }

    #[tokio::test]
    async fn passwords_reach_the_provider_as_typed() {
        let (session, provider) = session();
        let form = FormData::new()
            .with("full_name", "Maya Chen")
            .with("email", " maya@northeastern.edu ")
            .with("password", "  pass word  ");

        SignUpCompletion::new(session.clone())
            .complete(&form)
            .await
            .expect("sign up succeeds");
        session.sign_out().await.expect("sign out succeeds");
        SignInCompletion::new(session)
            .complete(&form)
            .await
            .expect("sign in succeeds");

        assert_eq!(
            provider.received_passwords(),
            vec!["  pass word  ".to_string(), "  pass word  ".to_string()]
        );
    }
}
