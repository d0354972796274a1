//! Status code and JSON body for every workflow operation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use super::domain::{Listing, ListingKind};
use super::service::ListingServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Transition,
    ListAvailable,
    ListBySeller,
    Delete,
    Update,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Transition => "transition",
            Operation::ListAvailable => "list_available",
            Operation::ListBySeller => "list_by_seller",
            Operation::Delete => "delete",
            Operation::Update => "update",
        }
    }

    fn failure_message(self, kind: ListingKind) -> &'static str {
        match (self, kind) {
            (Operation::Create, ListingKind::Sale) => "Failed to list property",
            (Operation::Create, ListingKind::Rental) => "Failed to list the rented property",
            (Operation::Transition, ListingKind::Sale) => "Failed to buy property",
            (Operation::Transition, ListingKind::Rental) => "Failed to rent property",
            (Operation::ListAvailable, _) => "Failed to get properties",
            (Operation::ListBySeller, _) => "Failed to get property",
            (Operation::Delete, _) => "Failed to delete property",
            (Operation::Update, _) => "Failed to update property",
        }
    }
}

/// Response payload shapes shared by both listing kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutcomeBody {
    Listings(Vec<Listing>),
    Confirmation {
        success: bool,
        message: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        property: Option<Listing>,
    },
    SellerListings {
        success: bool,
        property: Vec<Listing>,
    },
    Failure {
        success: bool,
        error: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        fields: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

/// Transport-independent result of one listing operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingOutcome {
    pub status: StatusCode,
    pub body: OutcomeBody,
}

impl ListingOutcome {
    fn confirmation(status: StatusCode, message: &'static str, property: Option<Listing>) -> Self {
        Self {
            status,
            body: OutcomeBody::Confirmation {
                success: true,
                message,
                property,
            },
        }
    }

    pub fn created(kind: ListingKind, listing: Listing) -> Self {
        let message = match kind {
            ListingKind::Sale => "Property listed successfully",
            ListingKind::Rental => "Property listed for rent successfully",
        };
        Self::confirmation(StatusCode::CREATED, message, Some(listing))
    }

    pub fn transitioned(kind: ListingKind, listing: Listing) -> Self {
        let message = match kind {
            ListingKind::Sale => "Property bought successfully",
            ListingKind::Rental => "Property rented successfully",
        };
        Self::confirmation(StatusCode::OK, message, Some(listing))
    }

    pub fn available(listings: Vec<Listing>) -> Self {
        Self {
            status: StatusCode::OK,
            body: OutcomeBody::Listings(listings),
        }
    }

    pub fn by_seller(listings: Vec<Listing>) -> Self {
        Self {
            status: StatusCode::OK,
            body: OutcomeBody::SellerListings {
                success: true,
                property: listings,
            },
        }
    }

    pub fn deleted() -> Self {
        Self::confirmation(StatusCode::OK, "Property deleted successfully", None)
    }

    pub fn updated(listing: Listing) -> Self {
        Self::confirmation(StatusCode::OK, "Property updated successfully", Some(listing))
    }

    fn rejected(
        status: StatusCode,
        error: &'static str,
        fields: Option<Vec<String>>,
        detail: Option<String>,
    ) -> Self {
        Self {
            status,
            body: OutcomeBody::Failure {
                success: false,
                error,
                fields,
                detail,
            },
        }
    }

    pub fn not_found() -> Self {
        Self::rejected(StatusCode::NOT_FOUND, "Property not found", None, None)
    }

    pub fn malformed_request(detail: String) -> Self {
        Self::rejected(
            StatusCode::BAD_REQUEST,
            "Malformed request body",
            None,
            Some(detail),
        )
    }

    pub fn payload_too_large(detail: String) -> Self {
        Self::rejected(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Request body too large",
            None,
            Some(detail),
        )
    }

    /// Maps a workflow error; upload and store failures share one 500 body.
    pub fn failure(kind: ListingKind, operation: Operation, err: ListingServiceError) -> Self {
        match err {
            ListingServiceError::MissingFields(fields) => Self::rejected(
                StatusCode::BAD_REQUEST,
                "Missing required fields",
                Some(fields),
                None,
            ),
            ListingServiceError::MissingImage => Self::rejected(
                StatusCode::BAD_REQUEST,
                "Property image is required",
                None,
                None,
            ),
            ListingServiceError::InvalidField(field_error) => Self::rejected(
                StatusCode::BAD_REQUEST,
                "Invalid field value",
                Some(vec![field_error.field.clone()]),
                Some(field_error.to_string()),
            ),
            ListingServiceError::NotFound(_) => Self::not_found(),
            ListingServiceError::UploadFailed(_) | ListingServiceError::Persistence(_) => {
                error!(
                    kind = kind.label(),
                    operation = operation.label(),
                    error = %err,
                    "listing operation failed"
                );
                Self::rejected(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    operation.failure_message(kind),
                    None,
                    None,
                )
            }
        }
    }

    /// Collapses an operation result into its outcome.
    pub fn from_result<T>(
        kind: ListingKind,
        operation: Operation,
        result: Result<T, ListingServiceError>,
        on_success: impl FnOnce(T) -> Self,
    ) -> Self {
        match result {
            Ok(value) => on_success(value),
            Err(err) => Self::failure(kind, operation, err),
        }
    }
}

impl IntoResponse for ListingOutcome {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
