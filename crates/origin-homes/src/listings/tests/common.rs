use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::listings::validation::{
    OWNER_NAME, PHONE_NUMBER, PRICE, PROPERTY_IMAGE, PROPERTY_LOCATION, PROPERTY_TITLE,
    PROPERTY_TYPE, SELLER_ID,
};
use crate::listings::{
    ImagePayload, Listing, ListingForm, ListingId, ListingKind, ListingRepository,
    ListingService, ListingStatus, MediaError, MediaStore, RepositoryError, SellerId,
    UploadedImage,
};
use crate::storage::InMemoryListingRepository;

pub(super) const SELLER: &str = "6f1c2a54-3a0c-4d55-9f6e-0b7d2f1e8c11";
pub(super) const UPLOAD_BASE: &str =
    "https://res.cloudinary.com/demo/image/upload/v1700000000/real_state_property_images";

pub(super) fn image(file_name: &str) -> ImagePayload {
    ImagePayload::new(file_name, b"\xff\xd8\xff\xe0jpeg".to_vec()).with_content_type("image/jpeg")
}

pub(super) fn complete_fields() -> ListingForm {
    ListingForm::new()
        .with_field(SELLER_ID, SELLER)
        .with_field(OWNER_NAME, "John Doe")
        .with_field(PROPERTY_LOCATION, "Kathmandu")
        .with_field(PROPERTY_TYPE, "House")
        .with_field(PROPERTY_TITLE, "Beautiful Home")
        .with_field(PHONE_NUMBER, "9800000000")
        .with_field(PRICE, "50000")
}

pub(super) fn complete_form() -> ListingForm {
    complete_fields().with_image(image("home.jpg"))
}

/// A persisted listing whose image lives at `property_image`.
pub(super) fn stored_listing(property_image: &str) -> Listing {
    let at = Utc
        .with_ymd_and_hms(2024, 3, 14, 8, 0, 0)
        .single()
        .expect("valid time");
    Listing {
        id: ListingId::generate(),
        seller_id: SellerId(Uuid::parse_str(SELLER).expect("valid uuid")),
        owner_name: "John Doe".to_string(),
        property_location: "Kathmandu".to_string(),
        property_type: "House".to_string(),
        property_title: "Beautiful Home".to_string(),
        phone_number: "9800000000".to_string(),
        price: Decimal::new(5_000_000, 2),
        description: None,
        property_image: property_image.to_string(),
        property_features: None,
        status: ListingStatus::OnSale,
        created_at: at,
        updated_at: at,
    }
}

pub(super) type TestService = ListingService<InMemoryListingRepository, RecordingMedia>;

pub(super) fn build_service(
    kind: ListingKind,
) -> (TestService, Arc<InMemoryListingRepository>, Arc<RecordingMedia>) {
    let repository = Arc::new(InMemoryListingRepository::new());
    let media = Arc::new(RecordingMedia::default());
    let service = ListingService::new(kind, repository.clone(), media.clone());
    (service, repository, media)
}

/// Media store stub that hands out predictable URLs and records every call.
#[derive(Default)]
pub(super) struct RecordingMedia {
    uploads: Mutex<Vec<String>>,
    destroyed: Mutex<Vec<String>>,
}

impl RecordingMedia {
    pub(super) fn uploads(&self) -> Vec<String> {
        self.uploads.lock().expect("upload log poisoned").clone()
    }

    pub(super) fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().expect("destroy log poisoned").clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMedia {
    async fn upload(&self, image: ImagePayload) -> Result<UploadedImage, MediaError> {
        let mut uploads = self.uploads.lock().expect("upload log poisoned");
        uploads.push(image.file_name.clone());
        let public_id = format!("real_state_property_images/{}-{}", uploads.len(), image.file_name);
        Ok(UploadedImage {
            secure_url: format!("{UPLOAD_BASE}/{}-{}", uploads.len(), image.file_name),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        self.destroyed
            .lock()
            .expect("destroy log poisoned")
            .push(public_id.to_string());
        Ok(())
    }
}

/// Media store whose host is never reachable.
pub(super) struct FailingMedia;

#[async_trait]
impl MediaStore for FailingMedia {
    async fn upload(&self, _image: ImagePayload) -> Result<UploadedImage, MediaError> {
        Err(MediaError::Transport("connection refused".to_string()))
    }

    async fn destroy(&self, _public_id: &str) -> Result<(), MediaError> {
        Err(MediaError::Rejected {
            status: 401,
            message: "Invalid Signature".to_string(),
        })
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl ListingRepository for UnavailableRepository {
    async fn insert(&self, _listing: Listing) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(&self, _id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn update(&self, _listing: Listing) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn delete(&self, _id: &ListingId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn with_status(&self, _status: ListingStatus) -> Result<Vec<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn by_seller(&self, _seller_id: &SellerId) -> Result<Vec<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) const BOUNDARY: &str = "origin-homes-test-boundary";

/// Encodes text fields and an optional `propertyImage` file as multipart/form-data.
pub(super) fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{PROPERTY_IMAGE}\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub(super) fn complete_text_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        (SELLER_ID, SELLER),
        (OWNER_NAME, "John Doe"),
        (PROPERTY_LOCATION, "Kathmandu"),
        (PROPERTY_TYPE, "House"),
        (PROPERTY_TITLE, "Beautiful Home"),
        (PHONE_NUMBER, "9800000000"),
        (PRICE, "50000"),
    ]
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
