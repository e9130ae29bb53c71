use crate::config::ConfigError;
use crate::listings::{ListingServiceError, RepositoryError};
use crate::matching::VocabularyError;
use crate::telemetry::TelemetryError;
use crate::wizard::{WizardError, WizardServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Listing(ListingServiceError),
    Vocabulary(VocabularyError),
    Wizard(WizardServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Listing(err) => write!(f, "listing error: {}", err),
            AppError::Vocabulary(err) => write!(f, "skill search error: {}", err),
            AppError::Wizard(err) => write!(f, "wizard error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Listing(err) => Some(err),
            AppError::Vocabulary(err) => Some(err),
            AppError::Wizard(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Listing(ListingServiceError::Filter(_))
            | AppError::Vocabulary(_)
            | AppError::Wizard(WizardServiceError::UnsupportedFlow(_))
            | AppError::Wizard(WizardServiceError::Step(WizardError::Incomplete { .. })) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Listing(ListingServiceError::Repository(RepositoryError::NotFound))
            | AppError::Wizard(WizardServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Listing(ListingServiceError::Repository(RepositoryError::Conflict))
            | AppError::Wizard(WizardServiceError::AlreadySignedIn(_))
            | AppError::Wizard(WizardServiceError::Step(_)) => StatusCode::CONFLICT,
            AppError::Wizard(WizardServiceError::Unauthenticated(_)) => StatusCode::UNAUTHORIZED,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Listing(ListingServiceError::Repository(RepositoryError::Unavailable(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ListingServiceError> for AppError {
    fn from(value: ListingServiceError) -> Self {
        Self::Listing(value)
    }
}

impl From<VocabularyError> for AppError {
    fn from(value: VocabularyError) -> Self {
        Self::Vocabulary(value)
    }
}

impl From<WizardServiceError> for AppError {
    fn from(value: WizardServiceError) -> Self {
        Self::Wizard(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn startup_failures_render_as_json_500() {
        let error = AppError::from(ConfigError::InvalidPort);
        assert!(error.to_string().starts_with("configuration error:"));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("configuration error:")));
    }

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let unknown = AppError::from(VocabularyError::UnknownCategory("Cooking".to_string()));
        assert_eq!(
            unknown.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let missing = AppError::from(ListingServiceError::Repository(RepositoryError::NotFound));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let duplicate = AppError::from(ListingServiceError::Repository(RepositoryError::Conflict));
        assert_eq!(duplicate.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn io_errors_keep_their_source() {
        let error = AppError::from(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "port taken",
        ));
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.to_string(), "io error: port taken");
    }
}
