use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to a listing when it is first persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub Uuid);

impl ListingId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a path segment; anything that is not a UUID cannot name a listing.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Owner reference supplied by the seller on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(pub Uuid);

impl SellerId {
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for SellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingStatus {
    #[default]
    OnSale,
    Sold,
    Rented,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::OnSale => "onSale",
            ListingStatus::Sold => "sold",
            ListingStatus::Rented => "rented",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ListingStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "onSale" => Ok(ListingStatus::OnSale),
            "sold" => Ok(ListingStatus::Sold),
            "rented" => Ok(ListingStatus::Rented),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Descriptor that separates the sale and rental workflows.
///
/// Both kinds share one workflow implementation; the kind decides which
/// table a repository writes to, which status a transition lands on, the
/// HTTP paths and the wording of confirmation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingKind {
    Sale,
    Rental,
}

impl ListingKind {
    /// Status set by the purchase / rent transition.
    pub fn terminal_status(self) -> ListingStatus {
        match self {
            ListingKind::Sale => ListingStatus::Sold,
            ListingKind::Rental => ListingStatus::Rented,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingKind::Sale => "sale",
            ListingKind::Rental => "rental",
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            ListingKind::Sale => "properties",
            ListingKind::Rental => "rental_properties",
        }
    }

    pub fn route_prefix(self) -> &'static str {
        match self {
            ListingKind::Sale => "/property",
            ListingKind::Rental => "/rental",
        }
    }

    pub fn create_path(self) -> &'static str {
        match self {
            ListingKind::Sale => "/sell",
            ListingKind::Rental => "/rentout",
        }
    }

    pub fn transition_path(self) -> &'static str {
        match self {
            ListingKind::Sale => "/buy/:id",
            ListingKind::Rental => "/rent/:id",
        }
    }
}

/// Persisted listing as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub seller_id: SellerId,
    pub owner_name: String,
    pub property_location: String,
    pub property_type: String,
    pub property_title: String,
    pub phone_number: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub description: Option<String>,
    pub property_image: String,
    pub property_features: Option<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Materialises a validated draft once its image has been uploaded.
    pub fn from_draft(draft: ListingDraft, property_image: String, now: DateTime<Utc>) -> Self {
        Self {
            id: ListingId::generate(),
            seller_id: draft.seller_id,
            owner_name: draft.owner_name,
            property_location: draft.property_location,
            property_type: draft.property_type,
            property_title: draft.property_title,
            phone_number: draft.phone_number,
            price: draft.price,
            description: draft.description,
            property_image,
            property_features: draft.property_features,
            status: ListingStatus::OnSale,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a shallow patch; fields the patch leaves unset are untouched.
    pub fn apply(&mut self, patch: ListingPatch) {
        let ListingPatch {
            owner_name,
            property_location,
            property_type,
            property_title,
            phone_number,
            price,
            description,
            property_features,
        } = patch;

        if let Some(value) = owner_name {
            self.owner_name = value;
        }
        if let Some(value) = property_location {
            self.property_location = value;
        }
        if let Some(value) = property_type {
            self.property_type = value;
        }
        if let Some(value) = property_title {
            self.property_title = value;
        }
        if let Some(value) = phone_number {
            self.phone_number = value;
        }
        if let Some(value) = price {
            self.price = value;
        }
        if let Some(value) = description {
            self.description = Some(value);
        }
        if let Some(value) = property_features {
            self.property_features = Some(value);
        }
    }
}

/// Validated create input, still lacking the hosted image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub seller_id: SellerId,
    pub owner_name: String,
    pub property_location: String,
    pub property_type: String,
    pub property_title: String,
    pub phone_number: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub property_features: Option<String>,
}

/// Mutable subset of a listing submitted through Update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPatch {
    pub owner_name: Option<String>,
    pub property_location: Option<String>,
    pub property_type: Option<String>,
    pub property_title: Option<String>,
    pub phone_number: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub property_features: Option<String>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
