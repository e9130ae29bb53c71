use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::listings::catalog::{seed_founders, seed_jobs};
use crate::listings::domain::{Founder, Job, Listing};
use crate::listings::filter::{founder_filters, job_filters, FilterCatalog, ListingQuery};
use crate::listings::repository::{InMemoryListingRepository, ListingRepository, RepositoryError};
use crate::listings::service::ListingService;

pub(super) fn ids<R: Listing>(records: &[R]) -> Vec<&str> {
    records.iter().map(Listing::listing_id).collect()
}

pub(super) fn ref_ids<'a, R: Listing>(records: &[&'a R]) -> Vec<&'a str> {
    records.iter().map(|record| record.listing_id()).collect()
}

pub(super) fn jobs() -> Vec<Job> {
    seed_jobs()
}

pub(super) fn founders() -> Vec<Founder> {
    seed_founders()
}

pub(super) fn query_with(
    catalog: &FilterCatalog<impl Listing>,
    text: &str,
    selections: &[(&str, &str)],
) -> ListingQuery {
    let mut query = ListingQuery::text(text);
    for (group, option) in selections {
        query
            .selection
            .select(catalog, group, option)
            .expect("option belongs to catalog");
    }
    query
}

pub(super) fn job_service(
    per_page: usize,
) -> (
    ListingService<Job, InMemoryListingRepository<Job>>,
    Arc<InMemoryListingRepository<Job>>,
) {
    let repository = Arc::new(InMemoryListingRepository::new(jobs(), job_filters()));
    let service = ListingService::new(repository.clone(), job_filters(), per_page);
    (service, repository)
}

pub(super) fn founder_service(
    per_page: usize,
) -> ListingService<Founder, InMemoryListingRepository<Founder>> {
    let repository = Arc::new(InMemoryListingRepository::new(founders(), founder_filters()));
    ListingService::new(repository, founder_filters(), per_page)
}

/// Repository double whose backing store is always offline.
pub(super) struct UnavailableRepository;

impl ListingRepository<Job> for UnavailableRepository {
    fn list(&self, _query: &ListingQuery) -> Result<Vec<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &str) -> Result<Option<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn insert(&self, _record: Job) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn insert_new(&self, _record: Job) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn set_bookmark(&self, _id: &str, _bookmarked: bool) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json body")
}
