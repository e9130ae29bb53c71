//! Job and co-founder listings: records, grouped filters, repositories and search service.

pub mod catalog;
pub mod domain;
pub mod filter;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Founder, FounderId, FounderSort, Job, JobId, JobSort, Listing, SortOrder};
pub use filter::{
    filter_records, founder_filters, job_filters, location_matches, FilterCatalog, FilterError,
    FilterGroup, FilterGroupView, FilterSelection, FilterToggles, ListingQuery,
};
pub use repository::{InMemoryListingRepository, ListingRepository, RepositoryError};
pub use router::listing_router;
pub use service::{ListingService, ListingServiceError, SearchPage, SearchRequest};

/// Job board service over the in-memory seed catalog.
pub type JobService = ListingService<Job, InMemoryListingRepository<Job>>;

/// Co-founder service over the in-memory seed catalog.
pub type FounderService = ListingService<Founder, InMemoryListingRepository<Founder>>;

pub fn seeded_job_service(per_page: usize) -> JobService {
    let repository = InMemoryListingRepository::new(catalog::seed_jobs(), job_filters());
    ListingService::new(std::sync::Arc::new(repository), job_filters(), per_page)
}

pub fn seeded_founder_service(per_page: usize) -> FounderService {
    let repository = InMemoryListingRepository::new(catalog::seed_founders(), founder_filters());
    ListingService::new(std::sync::Arc::new(repository), founder_filters(), per_page)
}
