use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{Listing, ListingId, ListingKind, ListingStatus, SellerId};
use super::media::{public_id_from_url, ImagePayload, MediaError, MediaStore, UploadedImage};
use super::repository::{ListingRepository, RepositoryError};
use super::validation::{FieldError, ListingForm};

/// Listing lifecycle workflow for one [`ListingKind`].
///
/// Coordinates validation, the hosted image library and the repository.
/// Nothing is retried: the first failing step aborts the operation.
pub struct ListingService<R, M> {
    kind: ListingKind,
    repository: Arc<R>,
    media: Arc<M>,
}

/// What happened to the hosted image when its listing was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageCleanup {
    Destroyed { public_id: String },
    /// The stored URL does not name a hosted image.
    Skipped,
    Failed { public_id: String, reason: String },
}

/// A deleted listing and the outcome of releasing its image.
#[derive(Debug, Clone)]
pub struct RemovedListing {
    pub listing: Listing,
    pub image: ImageCleanup,
}

impl<R, M> ListingService<R, M>
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    pub fn new(kind: ListingKind, repository: Arc<R>, media: Arc<M>) -> Self {
        Self {
            kind,
            repository,
            media,
        }
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    /// Validates the form, uploads its image and persists a new `onSale` listing.
    pub async fn create(&self, mut form: ListingForm) -> Result<Listing, ListingServiceError> {
        let report = form.validate();
        if !report.missing.is_empty() {
            debug!(kind = self.kind.label(), missing = ?report.missing, "rejecting incomplete listing");
            return Err(ListingServiceError::MissingFields(report.missing));
        }
        let image = form.image.take().ok_or(ListingServiceError::MissingImage)?;
        let draft = form.draft()?;

        let uploaded = self.upload(image).await?;
        let listing = Listing::from_draft(draft, uploaded.secure_url, Utc::now());
        let id = listing.id;

        match self.repository.insert(listing).await {
            Ok(stored) => {
                info!(kind = self.kind.label(), listing_id = %id, seller_id = %stored.seller_id, "listing created");
                Ok(stored)
            }
            Err(err) => {
                warn!(
                    kind = self.kind.label(),
                    public_id = %uploaded.public_id,
                    "listing was not persisted; uploaded image is orphaned"
                );
                Err(ListingServiceError::Persistence(err))
            }
        }
    }

    /// Moves a listing to the kind's terminal status (`sold` or `rented`).
    ///
    /// The current status is not checked, so repeating a transition succeeds.
    pub async fn transition(&self, id: &ListingId) -> Result<Listing, ListingServiceError> {
        let mut listing = self.find(id).await?;
        let previous = listing.status;
        listing.status = self.kind.terminal_status();
        listing.updated_at = Utc::now();

        let stored = self
            .repository
            .update(listing)
            .await
            .map_err(|err| not_found_or_persistence(id, err))?;
        info!(
            kind = self.kind.label(),
            listing_id = %id,
            from = %previous,
            to = %stored.status,
            "listing status changed"
        );
        Ok(stored)
    }

    /// Listings that are still on the market.
    pub async fn available(&self) -> Result<Vec<Listing>, ListingServiceError> {
        self.repository
            .with_status(ListingStatus::OnSale)
            .await
            .map_err(ListingServiceError::Persistence)
    }

    /// Every listing owned by `seller_id`; an empty result is not an error.
    pub async fn by_seller(&self, seller_id: &SellerId) -> Result<Vec<Listing>, ListingServiceError> {
        self.repository
            .by_seller(seller_id)
            .await
            .map_err(ListingServiceError::Persistence)
    }

    /// Releases the hosted image (best effort) and deletes the row.
    pub async fn delete(&self, id: &ListingId) -> Result<RemovedListing, ListingServiceError> {
        let listing = self.find(id).await?;
        let image = self.release_image(id, &listing.property_image).await;

        self.repository
            .delete(id)
            .await
            .map_err(|err| not_found_or_persistence(id, err))?;
        info!(kind = self.kind.label(), listing_id = %id, "listing deleted");

        Ok(RemovedListing { listing, image })
    }

    /// Applies the submitted fields and, when present, a replacement image.
    ///
    /// The previously hosted image is left in place.
    pub async fn update(
        &self,
        id: &ListingId,
        form: ListingForm,
    ) -> Result<Listing, ListingServiceError> {
        let mut listing = self.find(id).await?;
        let patch = form.patch(&listing.seller_id)?;

        if let Some(image) = form.image {
            let uploaded = self.upload(image).await?;
            debug!(
                listing_id = %id,
                previous = %listing.property_image,
                "replacing listing image"
            );
            listing.property_image = uploaded.secure_url;
        }
        listing.apply(patch);
        listing.updated_at = Utc::now();

        let stored = self
            .repository
            .update(listing)
            .await
            .map_err(|err| not_found_or_persistence(id, err))?;
        info!(kind = self.kind.label(), listing_id = %id, "listing updated");
        Ok(stored)
    }

    async fn find(&self, id: &ListingId) -> Result<Listing, ListingServiceError> {
        self.repository
            .fetch(id)
            .await
            .map_err(ListingServiceError::Persistence)?
            .ok_or(ListingServiceError::NotFound(*id))
    }

    async fn upload(&self, image: ImagePayload) -> Result<UploadedImage, ListingServiceError> {
        debug!(kind = self.kind.label(), image = ?image, "uploading listing image");
        self.media
            .upload(image)
            .await
            .map_err(ListingServiceError::UploadFailed)
    }

    async fn release_image(&self, id: &ListingId, url: &str) -> ImageCleanup {
        let Some(public_id) = public_id_from_url(url) else {
            debug!(listing_id = %id, url, "image url has no public id; skipping remote delete");
            return ImageCleanup::Skipped;
        };

        match self.media.destroy(public_id).await {
            Ok(()) => ImageCleanup::Destroyed {
                public_id: public_id.to_string(),
            },
            Err(err) => {
                warn!(listing_id = %id, public_id, error = %err, "failed to delete hosted image");
                ImageCleanup::Failed {
                    public_id: public_id.to_string(),
                    reason: err.to_string(),
                }
            }
        }
    }
}

fn not_found_or_persistence(id: &ListingId, err: RepositoryError) -> ListingServiceError {
    match err {
        RepositoryError::NotFound => ListingServiceError::NotFound(*id),
        other => ListingServiceError::Persistence(other),
    }
}

/// Error raised by the listing workflow.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("property image is required")]
    MissingImage,
    #[error(transparent)]
    InvalidField(#[from] FieldError),
    #[error("image upload failed: {0}")]
    UploadFailed(#[source] MediaError),
    #[error("listing {0} not found")]
    NotFound(ListingId),
    #[error("listing store failed: {0}")]
    Persistence(#[source] RepositoryError),
}
