//! Presence checks and typed parsing for submitted listing forms.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::domain::{ListingDraft, ListingPatch, SellerId};
use super::media::ImagePayload;

pub const SELLER_ID: &str = "sellerId";
pub const OWNER_NAME: &str = "ownerName";
pub const PROPERTY_LOCATION: &str = "propertyLocation";
pub const PROPERTY_TYPE: &str = "propertyType";
pub const PROPERTY_TITLE: &str = "propertyTitle";
pub const PHONE_NUMBER: &str = "phoneNumber";
pub const PRICE: &str = "price";
pub const DESCRIPTION: &str = "description";
pub const PROPERTY_FEATURES: &str = "propertyFeatures";
pub const PROPERTY_IMAGE: &str = "propertyImage";

/// Fields every new listing must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 7] = [
    SELLER_ID,
    OWNER_NAME,
    PROPERTY_LOCATION,
    PROPERTY_TYPE,
    PROPERTY_TITLE,
    PHONE_NUMBER,
    PRICE,
];

const IMMUTABLE_FIELDS: [&str; 3] = ["id", "status", "createdAt"];

/// Submitted text fields plus the optional image attachment.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub fields: BTreeMap<String, String>,
    pub image: Option<ImagePayload>,
}

/// Result of the presence checks run before anything leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub missing: Vec<String>,
    pub has_image: bool,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.has_image
    }
}

/// A submitted value that is present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {reason}")]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Required fields that are absent or submitted as an empty string.
pub fn missing_fields(fields: &BTreeMap<String, String>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|name| fields.get(**name).map_or(true, |value| value.is_empty()))
        .map(|name| name.to_string())
        .collect()
}

impl ListingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn validate(&self) -> ValidationReport {
        ValidationReport {
            missing: missing_fields(&self.fields),
            has_image: self.image.is_some(),
        }
    }

    /// Non-empty value of `name`, if submitted.
    fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, FieldError> {
        self.value(name)
            .map(str::to_string)
            .ok_or_else(|| FieldError::new(name, "is required"))
    }

    /// Parses a form that already passed [`ListingForm::validate`].
    pub fn draft(&self) -> Result<ListingDraft, FieldError> {
        let seller_raw = self.required(SELLER_ID)?;
        let seller_id = SellerId::parse(&seller_raw)
            .ok_or_else(|| FieldError::new(SELLER_ID, "must be a UUID"))?;
        let phone_number = parse_phone_number(&self.required(PHONE_NUMBER)?)?;
        let price = parse_price(&self.required(PRICE)?)?;

        Ok(ListingDraft {
            seller_id,
            owner_name: self.required(OWNER_NAME)?,
            property_location: self.required(PROPERTY_LOCATION)?,
            property_type: self.required(PROPERTY_TYPE)?,
            property_title: self.required(PROPERTY_TITLE)?,
            phone_number,
            price,
            description: self.value(DESCRIPTION).map(str::to_string),
            property_features: self.value(PROPERTY_FEATURES).map(str::to_string),
        })
    }

    /// Parses the submitted subset of fields for an update.
    ///
    /// Empty values leave the stored field unchanged; unknown keys are ignored.
    /// A `sellerId` is accepted only when it names the current `owner`.
    pub fn patch(&self, owner: &SellerId) -> Result<ListingPatch, FieldError> {
        if let Some(field) = IMMUTABLE_FIELDS
            .iter()
            .find(|name| self.fields.contains_key(**name))
        {
            return Err(FieldError::new(field, "cannot be changed"));
        }
        if let Some(submitted) = self.fields.get(SELLER_ID) {
            if SellerId::parse(submitted).as_ref() != Some(owner) {
                return Err(FieldError::new(SELLER_ID, "cannot be changed"));
            }
        }
        if self.fields.contains_key(PROPERTY_IMAGE) {
            return Err(FieldError::new(PROPERTY_IMAGE, "must be uploaded as a file"));
        }

        let text = |name: &str| self.value(name).map(str::to_string);

        Ok(ListingPatch {
            owner_name: text(OWNER_NAME),
            property_location: text(PROPERTY_LOCATION),
            property_type: text(PROPERTY_TYPE),
            property_title: text(PROPERTY_TITLE),
            phone_number: self.value(PHONE_NUMBER).map(parse_phone_number).transpose()?,
            price: self.value(PRICE).map(parse_price).transpose()?,
            description: text(DESCRIPTION),
            property_features: text(PROPERTY_FEATURES),
        })
    }
}

fn parse_phone_number(raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(FieldError::new(PHONE_NUMBER, "must contain digits only"));
    }
    Ok(trimmed.to_string())
}

fn parse_price(raw: &str) -> Result<Decimal, FieldError> {
    let mut price: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| FieldError::new(PRICE, "must be a decimal number"))?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(FieldError::new(PRICE, "must not be negative"));
    }
    if price.normalize().scale() > 2 {
        return Err(FieldError::new(PRICE, "must have at most two decimal places"));
    }
    // DECIMAL(10, 2) column bound.
    if price > Decimal::new(9_999_999_999, 2) {
        return Err(FieldError::new(PRICE, "exceeds 99999999.99"));
    }

    price.rescale(2);
    price.set_sign_positive(true);
    Ok(price)
}
