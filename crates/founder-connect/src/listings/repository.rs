use std::sync::{Arc, RwLock};

use super::domain::Listing;
use super::filter::{FilterCatalog, ListingQuery};

/// Storage abstraction so listing pages can move off the seed catalog without touching the
/// search logic.
pub trait ListingRepository<R: Listing>: Send + Sync {
    /// Records visible for `query`, in storage order.
    fn list(&self, query: &ListingQuery) -> Result<Vec<R>, RepositoryError>;
    fn fetch(&self, id: &str) -> Result<Option<R>, RepositoryError>;
    fn insert(&self, record: R) -> Result<R, RepositoryError>;
    /// Stores `record` under a freshly generated id, chosen while the store is locked.
    fn insert_new(&self, record: R) -> Result<R, RepositoryError>;
    fn set_bookmark(&self, id: &str, bookmarked: bool) -> Result<R, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Vector-backed repository evaluating queries with the filter engine.
pub struct InMemoryListingRepository<R: Listing> {
    records: Arc<RwLock<Vec<R>>>,
    catalog: FilterCatalog<R>,
}

impl<R: Listing> InMemoryListingRepository<R> {
    pub fn new(records: Vec<R>, catalog: FilterCatalog<R>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            catalog,
        }
    }

    pub fn catalog(&self) -> &FilterCatalog<R> {
        &self.catalog
    }
}

fn id_number<R: Listing>(id: &str) -> Option<u64> {
    id.strip_prefix(R::ID_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

fn poisoned<E>(_: E) -> RepositoryError {
    RepositoryError::Unavailable("listing store lock poisoned".to_string())
}

impl<R: Listing> ListingRepository<R> for InMemoryListingRepository<R> {
    fn list(&self, query: &ListingQuery) -> Result<Vec<R>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(self
            .catalog
            .apply(&guard, query)
            .into_iter()
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &str) -> Result<Option<R>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard
            .iter()
            .find(|record| record.listing_id() == id)
            .cloned())
    }

    fn insert(&self, record: R) -> Result<R, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        if guard
            .iter()
            .any(|existing| existing.listing_id() == record.listing_id())
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn insert_new(&self, mut record: R) -> Result<R, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let next = guard
            .iter()
            .filter_map(|existing| id_number::<R>(existing.listing_id()))
            .max()
            .unwrap_or(0)
            + 1;
        record.assign_id(format!("{}-{next:03}", R::ID_PREFIX));
        guard.push(record.clone());
        Ok(record)
    }

    fn set_bookmark(&self, id: &str, bookmarked: bool) -> Result<R, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let record = guard
            .iter_mut()
            .find(|record| record.listing_id() == id)
            .ok_or(RepositoryError::NotFound)?;
        record.set_bookmarked(bookmarked);
        Ok(record.clone())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.len())
    }
}
