//! Table definitions for sale and rental listings.
//!
//! Both tables share one column layout; only the table name differs.

macro_rules! listing_row_conversions {
    () => {
        use crate::listings::{Listing, ListingId, ListingStatus, RepositoryError, SellerId};
        use sea_orm::Set;

        impl Model {
            pub fn into_listing(self) -> Result<Listing, RepositoryError> {
                let id = self.id;
                let status = self.status.parse::<ListingStatus>().map_err(|err| {
                    RepositoryError::Corrupt(format!("listing {id}: {err}"))
                })?;

                Ok(Listing {
                    id: ListingId(self.id),
                    seller_id: SellerId(self.seller_id),
                    owner_name: self.owner_name,
                    property_location: self.property_location,
                    property_type: self.property_type,
                    property_title: self.property_title,
                    phone_number: self.phone_number,
                    price: self.price,
                    description: self.description,
                    property_image: self.property_image,
                    property_features: self.property_features,
                    status,
                    created_at: self.created_at,
                    updated_at: self.updated_at,
                })
            }
        }

        impl From<&Listing> for ActiveModel {
            fn from(listing: &Listing) -> Self {
                ActiveModel {
                    id: Set(listing.id.0),
                    seller_id: Set(listing.seller_id.0),
                    owner_name: Set(listing.owner_name.clone()),
                    property_location: Set(listing.property_location.clone()),
                    property_type: Set(listing.property_type.clone()),
                    property_title: Set(listing.property_title.clone()),
                    phone_number: Set(listing.phone_number.clone()),
                    price: Set(listing.price),
                    description: Set(listing.description.clone()),
                    property_image: Set(listing.property_image.clone()),
                    property_features: Set(listing.property_features.clone()),
                    status: Set(listing.status.as_str().to_string()),
                    created_at: Set(listing.created_at),
                    updated_at: Set(listing.updated_at),
                }
            }
        }
    };
}

pub mod sale_property {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "properties")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub seller_id: Uuid,
        pub owner_name: String,
        pub property_location: String,
        pub property_type: String,
        pub property_title: String,
        pub phone_number: String,
        #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
        pub price: Decimal,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        pub property_image: String,
        #[sea_orm(column_type = "Text", nullable)]
        pub property_features: Option<String>,
        pub status: String,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    listing_row_conversions!();
}

pub mod rental_property {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "rental_properties")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub seller_id: Uuid,
        pub owner_name: String,
        pub property_location: String,
        pub property_type: String,
        pub property_title: String,
        pub phone_number: String,
        #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
        pub price: Decimal,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        pub property_image: String,
        #[sea_orm(column_type = "Text", nullable)]
        pub property_features: Option<String>,
        pub status: String,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    listing_row_conversions!();
}
