use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use tracing::debug;

use super::domain::{ListingId, SellerId};
use super::media::{ImagePayload, MediaStore};
use super::outcome::{ListingOutcome, Operation};
use super::repository::ListingRepository;
use super::service::ListingService;
use super::validation::{ListingForm, PROPERTY_IMAGE};

/// Routes for one listing kind, relative to its prefix.
pub fn listing_router<R, M>(service: Arc<ListingService<R, M>>) -> Router
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    let kind = service.kind();
    Router::new()
        .route(kind.create_path(), post(create_handler::<R, M>))
        .route(kind.transition_path(), put(transition_handler::<R, M>))
        .route("/unsold", get(available_handler::<R, M>))
        .route("/seller/:seller_id", get(seller_handler::<R, M>))
        .route("/delete/:id", delete(delete_handler::<R, M>))
        .route("/update/:id", put(update_handler::<R, M>))
        .with_state(service)
}

/// Sale routes under `/property`, rental routes under `/rental`.
pub fn property_router<R, M>(
    sale: Arc<ListingService<R, M>>,
    rental: Arc<ListingService<R, M>>,
) -> Router
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    Router::new()
        .nest(sale.kind().route_prefix(), listing_router(sale))
        .nest(rental.kind().route_prefix(), listing_router(rental))
}

pub(crate) async fn create_handler<R, M>(
    State(service): State<Arc<ListingService<R, M>>>,
    multipart: Option<Multipart>,
) -> ListingOutcome
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(err) => return unreadable_body(err),
    };
    let kind = service.kind();
    ListingOutcome::from_result(kind, Operation::Create, service.create(form).await, |listing| {
        ListingOutcome::created(kind, listing)
    })
}

pub(crate) async fn transition_handler<R, M>(
    State(service): State<Arc<ListingService<R, M>>>,
    Path(id): Path<String>,
) -> ListingOutcome
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    let Some(id) = ListingId::parse(&id) else {
        return ListingOutcome::not_found();
    };
    let kind = service.kind();
    ListingOutcome::from_result(
        kind,
        Operation::Transition,
        service.transition(&id).await,
        |listing| ListingOutcome::transitioned(kind, listing),
    )
}

pub(crate) async fn available_handler<R, M>(
    State(service): State<Arc<ListingService<R, M>>>,
) -> ListingOutcome
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    ListingOutcome::from_result(
        service.kind(),
        Operation::ListAvailable,
        service.available().await,
        ListingOutcome::available,
    )
}

pub(crate) async fn seller_handler<R, M>(
    State(service): State<Arc<ListingService<R, M>>>,
    Path(seller_id): Path<String>,
) -> ListingOutcome
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    // A seller id that is not a UUID owns nothing.
    let Some(seller_id) = SellerId::parse(&seller_id) else {
        return ListingOutcome::by_seller(Vec::new());
    };
    ListingOutcome::from_result(
        service.kind(),
        Operation::ListBySeller,
        service.by_seller(&seller_id).await,
        ListingOutcome::by_seller,
    )
}

pub(crate) async fn delete_handler<R, M>(
    State(service): State<Arc<ListingService<R, M>>>,
    Path(id): Path<String>,
) -> ListingOutcome
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    let Some(id) = ListingId::parse(&id) else {
        return ListingOutcome::not_found();
    };
    ListingOutcome::from_result(
        service.kind(),
        Operation::Delete,
        service.delete(&id).await,
        |_| ListingOutcome::deleted(),
    )
}

pub(crate) async fn update_handler<R, M>(
    State(service): State<Arc<ListingService<R, M>>>,
    Path(id): Path<String>,
    multipart: Option<Multipart>,
) -> ListingOutcome
where
    R: ListingRepository + 'static,
    M: MediaStore + 'static,
{
    let Some(id) = ListingId::parse(&id) else {
        return ListingOutcome::not_found();
    };
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(err) => return unreadable_body(err),
    };
    ListingOutcome::from_result(
        service.kind(),
        Operation::Update,
        service.update(&id, form).await,
        ListingOutcome::updated,
    )
}

fn unreadable_body(err: MultipartError) -> ListingOutcome {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ListingOutcome::payload_too_large(err.body_text())
    } else {
        ListingOutcome::malformed_request(err.body_text())
    }
}

/// Collects text parts into fields and the `propertyImage` file part into the image.
///
/// A request without a multipart body yields an empty form.
async fn read_form(multipart: Option<Multipart>) -> Result<ListingForm, MultipartError> {
    let mut form = ListingForm::new();
    let Some(mut multipart) = multipart else {
        return Ok(form);
    };

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                if name != PROPERTY_IMAGE {
                    debug!(field = %name, "ignoring unexpected file part");
                    continue;
                }
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                if bytes.is_empty() {
                    continue;
                }
                form.image = Some(ImagePayload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}
