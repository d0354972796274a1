use async_trait::async_trait;

use super::domain::{Listing, ListingId, ListingStatus, SellerId};

/// Storage abstraction over one listing table.
///
/// Each [`super::ListingKind`] gets its own repository instance; the
/// workflow never sees which table it is writing to.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    async fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    /// Overwrites the stored row; `NotFound` when it vanished in the meantime.
    async fn update(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    async fn delete(&self, id: &ListingId) -> Result<(), RepositoryError>;
    async fn with_status(&self, status: ListingStatus) -> Result<Vec<Listing>, RepositoryError>;
    async fn by_seller(&self, seller_id: &SellerId) -> Result<Vec<Listing>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("stored record is malformed: {0}")]
    Corrupt(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
