use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Listing, SortOrder};
use super::repository::{ListingRepository, RepositoryError};
use super::service::{ListingServiceError, ListingService, SearchRequest};

/// Router builder exposing search, filter metadata, detail and bookmark endpoints under `base`.
pub fn listing_router<R, P, S>(base: &str, service: Arc<ListingService<R, P>>) -> Router
where
    R: Listing + Serialize,
    P: ListingRepository<R> + 'static,
    S: SortOrder<R> + DeserializeOwned + Default,
{
    Router::new()
        .route(&format!("{base}/search"), post(search_handler::<R, P, S>))
        .route(&format!("{base}/filters"), get(filters_handler::<R, P>))
        .route(&format!("{base}/:id"), get(detail_handler::<R, P>))
        .route(&format!("{base}/:id/bookmark"), put(bookmark_handler::<R, P>))
        .with_state(service)
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BookmarkRequest {
    pub bookmarked: bool,
}

pub(crate) async fn search_handler<R, P, S>(
    State(service): State<Arc<ListingService<R, P>>>,
    axum::Json(request): axum::Json<SearchRequest<S>>,
) -> Response
where
    R: Listing + Serialize,
    P: ListingRepository<R> + 'static,
    S: SortOrder<R> + DeserializeOwned + Default,
{
    match service.search(request) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn filters_handler<R, P>(
    State(service): State<Arc<ListingService<R, P>>>,
) -> Response
where
    R: Listing + Serialize,
    P: ListingRepository<R> + 'static,
{
    let payload = json!({ "groups": service.filters() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn detail_handler<R, P>(
    State(service): State<Arc<ListingService<R, P>>>,
    Path(id): Path<String>,
) -> Response
where
    R: Listing + Serialize,
    P: ListingRepository<R> + 'static,
{
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn bookmark_handler<R, P>(
    State(service): State<Arc<ListingService<R, P>>>,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<BookmarkRequest>,
) -> Response
where
    R: Listing + Serialize,
    P: ListingRepository<R> + 'static,
{
    match service.bookmark(&id, request.bookmarked) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ListingServiceError) -> Response {
    let status = match &error {
        ListingServiceError::Filter(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ListingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ListingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ListingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
