use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{Listing, SortOrder};
use super::filter::{FilterCatalog, FilterError, FilterGroupView, FilterToggles, ListingQuery};
use super::repository::{ListingRepository, RepositoryError};
use crate::pagination::{paginate, PageMarker};

/// Raw listing-page input as submitted by the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de> + Default"))]
pub struct SearchRequest<S> {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub bookmarked_only: bool,
    #[serde(default)]
    pub sort: S,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

/// One rendered page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage<R> {
    pub items: Vec<R>,
    pub current_page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_numbers: Vec<PageMarker>,
    pub active_filters: usize,
    /// Nothing matched; the page shows the "clear filters" empty state.
    pub empty: bool,
}

/// Service composing the filter catalog, repository and pagination for one listing kind.
pub struct ListingService<R: Listing, P> {
    repository: Arc<P>,
    catalog: FilterCatalog<R>,
    per_page: usize,
}

impl<R, P> ListingService<R, P>
where
    R: Listing,
    P: ListingRepository<R> + 'static,
{
    pub fn new(repository: Arc<P>, catalog: FilterCatalog<R>, per_page: usize) -> Self {
        Self {
            repository,
            catalog,
            per_page: per_page.max(1),
        }
    }

    pub fn filters(&self) -> Vec<FilterGroupView> {
        self.catalog.views()
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Filters, sorts and paginates the listing for a search form submission.
    pub fn search<S: SortOrder<R>>(
        &self,
        request: SearchRequest<S>,
    ) -> Result<SearchPage<R>, ListingServiceError> {
        let selection = self.catalog.selection_from(&request.filters)?;
        let active_filters = selection.active_groups();
        let query = ListingQuery {
            text: request.query,
            selection,
            toggles: FilterToggles {
                bookmarked_only: request.bookmarked_only,
            },
        };

        let mut records = self.repository.list(&query)?;
        request.sort.sort(&mut records);

        let page = paginate(records, request.page, self.per_page);
        debug!(
            query = %query.text,
            active_filters,
            total = page.total_items,
            page = page.current_page,
            "listing search evaluated"
        );

        let page_numbers = page.page_numbers();
        Ok(SearchPage {
            empty: page.is_empty(),
            current_page: page.current_page,
            per_page: page.per_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            items: page.items,
            page_numbers,
            active_filters,
        })
    }

    pub fn get(&self, id: &str) -> Result<R, ListingServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn bookmark(&self, id: &str, bookmarked: bool) -> Result<R, ListingServiceError> {
        let record = self.repository.set_bookmark(id, bookmarked)?;
        info!(listing = id, bookmarked, "bookmark updated");
        Ok(record)
    }

    /// Adds a new record, e.g. a job created through the posting wizard.
    pub fn publish(&self, record: R) -> Result<R, ListingServiceError> {
        let stored = self.repository.insert(record)?;
        info!(listing = stored.listing_id(), "listing published");
        Ok(stored)
    }

    /// Adds a new record under an id generated by the repository.
    pub fn publish_new(&self, record: R) -> Result<R, ListingServiceError> {
        let stored = self.repository.insert_new(record)?;
        info!(listing = stored.listing_id(), "listing published");
        Ok(stored)
    }

    pub fn total(&self) -> Result<usize, ListingServiceError> {
        Ok(self.repository.count()?)
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
