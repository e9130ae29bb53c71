use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::flows::FlowKind;
use super::form::FormData;
use super::machine::{KeyPress, WizardError};
use super::service::{WizardService, WizardServiceError};

/// Routes for creating and driving server-held wizard runs.
pub fn wizard_router(service: Arc<WizardService>) -> Router {
    Router::new()
        .route("/api/v1/wizards", post(start_handler))
        .route(
            "/api/v1/wizards/:id",
            get(view_handler).delete(abandon_handler),
        )
        .route("/api/v1/wizards/:id/answers", post(answer_handler))
        .route("/api/v1/wizards/:id/next", post(next_handler))
        .route("/api/v1/wizards/:id/back", post(back_handler))
        .route("/api/v1/wizards/:id/key", post(key_handler))
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartWizardRequest {
    pub flow: FlowKind,
    #[serde(default)]
    pub prefill: FormData,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct KeyRequest {
    pub key: KeyPress,
}

pub(crate) async fn start_handler(
    State(service): State<Arc<WizardService>>,
    Json(request): Json<StartWizardRequest>,
) -> Response {
    match service.start(request.flow, request.prefill).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_handler(
    State(service): State<Arc<WizardService>>,
    Path(id): Path<String>,
) -> Response {
    match service.view(&id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn abandon_handler(
    State(service): State<Arc<WizardService>>,
    Path(id): Path<String>,
) -> Response {
    match service.abandon(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler(
    State(service): State<Arc<WizardService>>,
    Path(id): Path<String>,
    Json(answers): Json<FormData>,
) -> Response {
    match service.answer(&id, answers).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn next_handler(
    State(service): State<Arc<WizardService>>,
    Path(id): Path<String>,
) -> Response {
    match service.next(&id).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn back_handler(
    State(service): State<Arc<WizardService>>,
    Path(id): Path<String>,
) -> Response {
    match service.back(&id).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn key_handler(
    State(service): State<Arc<WizardService>>,
    Path(id): Path<String>,
    Json(request): Json<KeyRequest>,
) -> Response {
    match service.key(&id, request.key).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: WizardServiceError) -> Response {
    let (status, redirect) = match &error {
        WizardServiceError::NotFound(_) => (StatusCode::NOT_FOUND, None),
        WizardServiceError::UnsupportedFlow(_)
        | WizardServiceError::Step(WizardError::Incomplete { .. })
        | WizardServiceError::Step(WizardError::NotAtTerminal) => {
            (StatusCode::UNPROCESSABLE_ENTITY, None)
        }
        WizardServiceError::Step(_) => (StatusCode::CONFLICT, None),
        WizardServiceError::Unauthenticated(redirect) => {
            (StatusCode::UNAUTHORIZED, Some(redirect.to.clone()))
        }
        WizardServiceError::AlreadySignedIn(redirect) => {
            (StatusCode::CONFLICT, Some(redirect.to.clone()))
        }
    };

    let mut payload = json!({ "error": error.to_string() });
    if let Some(redirect) = redirect {
        payload["redirect"] = json!(redirect);
    }
    (status, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::listings::seeded_job_service;
    use crate::session::testing::StubAuthProvider;
    use crate::session::SessionService;

    fn router() -> Router {
        let session = Arc::new(SessionService::new(Arc::new(StubAuthProvider::default())));
        let jobs = Arc::new(seeded_job_service(10));
        wizard_router(Arc::new(WizardService::with_default_handlers(
            session,
            jobs,
            Duration::ZERO,
        )))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }

    async fn read_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn start_returns_the_first_step() {
        let response = router()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wizards",
                json!({ "flow": "sign-up" }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["id"], "wiz-000001");
        assert_eq!(body["step"]["id"], "name");
        assert_eq!(body["total_steps"], 7);
        assert_eq!(body["state"]["state"], "editing");
    }

    #[tokio::test]
    async fn create_job_without_session_is_unauthorized() {
        let response = router()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wizards",
                json!({ "flow": "create-job" }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        assert_eq!(body["redirect"], "/signin");
    }

    #[tokio::test]
    async fn incomplete_step_is_unprocessable() {
        let app = router();
        app.clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wizards",
                json!({ "flow": "sign-in" }),
            ))
            .await
            .expect("router responds");

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wizards/wiz-000001/next",
                json!({}),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Please complete this step");
    }

    #[tokio::test]
    async fn answers_and_keys_drive_the_wizard() {
        let app = router();
        app.clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wizards",
                json!({ "flow": "sign-in" }),
            ))
            .await
            .expect("router responds");

        let answered = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wizards/wiz-000001/answers",
                json!({ "email": "maya@northeastern.edu" }),
            ))
            .await
            .expect("router responds");
        assert_eq!(answered.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wizards/wiz-000001/key",
                json!({ "key": "enter" }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["outcome"], "moved");
        assert_eq!(body["wizard"]["step"]["id"], "password");
        assert_eq!(body["wizard"]["progress"], 100.0);
    }

    #[tokio::test]
    async fn unknown_wizard_is_not_found() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/v1/wizards/wiz-999999")
                    .body(Body::empty())
                    .expect("valid request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
