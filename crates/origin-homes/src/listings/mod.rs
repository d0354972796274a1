//! Sale and rental listing lifecycle: validation, image hosting, persistence
//! and the HTTP surface shared by both listing kinds.

pub mod domain;
pub mod media;
pub mod outcome;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Listing, ListingDraft, ListingId, ListingKind, ListingPatch, ListingStatus, SellerId,
};
pub use media::{public_id_from_url, ImagePayload, MediaError, MediaStore, UploadedImage};
pub use outcome::{ListingOutcome, Operation, OutcomeBody};
pub use repository::{ListingRepository, RepositoryError};
pub use router::{listing_router, property_router};
pub use service::{ImageCleanup, ListingService, ListingServiceError, RemovedListing};
pub use validation::{missing_fields, FieldError, ListingForm, ValidationReport, REQUIRED_FIELDS};
