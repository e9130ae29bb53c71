use crate::infra::{AppState, Services};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router};
use founder_connect::listings::{listing_router, Founder, FounderSort, Job, JobSort};
use founder_connect::matching::{SkillVocabulary, VocabularyError};
use founder_connect::session::{
    AuthError, Credentials, ProfilePatch, SessionService, SIGN_IN_PATH,
};
use founder_connect::wizard::wizard_router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_app_routes(services: &Services) -> Router {
    listing_router::<Job, _, JobSort>("/api/v1/jobs", services.jobs.clone())
        .merge(listing_router::<Founder, _, FounderSort>(
            "/api/v1/founders",
            services.founders.clone(),
        ))
        .merge(wizard_router(services.wizards.clone()))
        .merge(skills_router(services.vocabulary.clone()))
        .merge(session_router(services.session.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn skills_router(vocabulary: Arc<SkillVocabulary>) -> Router {
    Router::new()
        .route("/api/v1/skills/search", get(skills_search_endpoint))
        .route("/api/v1/skills/categories", get(skill_categories_endpoint))
        .with_state(vocabulary)
}

fn session_router(session: Arc<SessionService>) -> Router {
    Router::new()
        .route("/api/v1/session", get(session_endpoint))
        .route("/api/v1/session/sign-in", post(sign_in_endpoint))
        .route("/api/v1/session/sign-out", post(sign_out_endpoint))
        .route("/api/v1/session/profile", patch(update_profile_endpoint))
        .with_state(session)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SkillSearchParams {
    #[serde(default)]
    pub(crate) q: String,
    pub(crate) category: Option<String>,
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SkillSearchResponse {
    pub(crate) query: String,
    pub(crate) category: Option<String>,
    pub(crate) skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SkillCategory {
    pub(crate) name: String,
    pub(crate) subcategories: Vec<String>,
}

pub(crate) async fn skills_search_endpoint(
    State(vocabulary): State<Arc<SkillVocabulary>>,
    Query(params): Query<SkillSearchParams>,
) -> Response {
    match vocabulary.search(&params.q, params.category.as_deref(), params.limit) {
        Ok(skills) => Json(SkillSearchResponse {
            query: params.q,
            category: params.category,
            skills,
        })
        .into_response(),
        Err(error @ VocabularyError::UnknownCategory(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn skill_categories_endpoint(
    State(vocabulary): State<Arc<SkillVocabulary>>,
) -> Json<Vec<SkillCategory>> {
    let categories = vocabulary
        .categories()
        .map(|name| SkillCategory {
            name: name.to_string(),
            subcategories: vocabulary
                .subcategories(name)
                .unwrap_or_default()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();
    Json(categories)
}

pub(crate) async fn session_endpoint(State(session): State<Arc<SessionService>>) -> Response {
    match session.initialize().await {
        Ok(_) => Json(session.state()).into_response(),
        Err(error) => auth_error_response(error),
    }
}

pub(crate) async fn sign_in_endpoint(
    State(session): State<Arc<SessionService>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    match session.sign_in(&credentials).await {
        Ok(user) => Json(user).into_response(),
        Err(error) => auth_error_response(error),
    }
}

pub(crate) async fn sign_out_endpoint(State(session): State<Arc<SessionService>>) -> Response {
    match session.sign_out().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => auth_error_response(error),
    }
}

pub(crate) async fn update_profile_endpoint(
    State(session): State<Arc<SessionService>>,
    Json(patch): Json<ProfilePatch>,
) -> Response {
    if patch.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "profile update has no fields" })),
        )
            .into_response();
    }
    match session.update_profile(&patch).await {
        Ok(user) => Json(user).into_response(),
        Err(error) => auth_error_response(error),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, payload) = match &error {
        AuthError::Rejected(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": message }),
        ),
        AuthError::NotAuthenticated => (
            StatusCode::UNAUTHORIZED,
            json!({ "error": error.to_string(), "redirect": SIGN_IN_PATH }),
        ),
        AuthError::Unavailable => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": error.to_string() }),
        ),
    };
    (status, Json(payload)).into_response()
}
