use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::listings::{Listing, ListingId, ListingRepository, ListingStatus, RepositoryError, SellerId};

/// Process-local listing table, used by tests and local demos.
#[derive(Default, Clone)]
pub struct InMemoryListingRepository {
    records: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<ListingId, Listing>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("listing table lock poisoned".to_string()))
    }

    fn select(
        &self,
        predicate: impl Fn(&Listing) -> bool,
    ) -> Result<Vec<Listing>, RepositoryError> {
        let mut selected: Vec<Listing> = self
            .records()?
            .values()
            .filter(|listing| predicate(listing))
            .cloned()
            .collect();
        selected.sort_by_key(|listing| (listing.created_at, listing.id));
        Ok(selected)
    }

    pub fn len(&self) -> usize {
        self.records().map(|records| records.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut records = self.records()?;
        if records.contains_key(&listing.id) {
            return Err(RepositoryError::Conflict);
        }
        records.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Ok(self.records()?.get(id).cloned())
    }

    async fn update(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut records = self.records()?;
        match records.get_mut(&listing.id) {
            Some(stored) => {
                *stored = listing.clone();
                Ok(listing)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        self.records()?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn with_status(&self, status: ListingStatus) -> Result<Vec<Listing>, RepositoryError> {
        self.select(|listing| listing.status == status)
    }

    async fn by_seller(&self, seller_id: &SellerId) -> Result<Vec<Listing>, RepositoryError> {
        self.select(|listing| listing.seller_id == *seller_id)
    }
}
