use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    SqlErr,
};

use super::entity;
use crate::listings::{
    Listing, ListingId, ListingKind, ListingRepository, ListingStatus, RepositoryError, SellerId,
};

/// Runs `$body` with `$table` bound to the entity module for `$kind`.
macro_rules! with_table {
    ($kind:expr, $table:ident => $body:expr) => {
        match $kind {
            ListingKind::Sale => {
                use entity::sale_property as $table;
                $body
            }
            ListingKind::Rental => {
                use entity::rental_property as $table;
                $body
            }
        }
    };
}

/// Listing repository backed by the `properties` / `rental_properties` tables.
///
/// Both kinds share one pool through the `Arc`.
#[derive(Clone)]
pub struct SeaOrmListingRepository {
    db: Arc<DatabaseConnection>,
    kind: ListingKind,
}

impl SeaOrmListingRepository {
    pub fn new(db: Arc<DatabaseConnection>, kind: ListingKind) -> Self {
        Self { db, kind }
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }
}

fn repository_error(err: DbErr) -> RepositoryError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return RepositoryError::Conflict;
    }
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepositoryError::NotFound,
        DbErr::Type(message) => RepositoryError::Corrupt(message),
        other => RepositoryError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        with_table!(self.kind, table => {
            table::ActiveModel::from(&listing)
                .insert(self.db.as_ref())
                .await
                .map_err(repository_error)?
                .into_listing()
        })
    }

    async fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        with_table!(self.kind, table => {
            table::Entity::find_by_id(id.0)
                .one(self.db.as_ref())
                .await
                .map_err(repository_error)?
                .map(table::Model::into_listing)
                .transpose()
        })
    }

    async fn update(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        with_table!(self.kind, table => {
            table::ActiveModel::from(&listing)
                .update(self.db.as_ref())
                .await
                .map_err(repository_error)?
                .into_listing()
        })
    }

    async fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        let result = with_table!(self.kind, table => {
            table::Entity::delete_by_id(id.0)
                .exec(self.db.as_ref())
                .await
                .map_err(repository_error)?
        });
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn with_status(&self, status: ListingStatus) -> Result<Vec<Listing>, RepositoryError> {
        with_table!(self.kind, table => {
            table::Entity::find()
                .filter(table::Column::Status.eq(status.as_str()))
                .order_by_asc(table::Column::CreatedAt)
                .all(self.db.as_ref())
                .await
                .map_err(repository_error)?
                .into_iter()
                .map(table::Model::into_listing)
                .collect()
        })
    }

    async fn by_seller(&self, seller_id: &SellerId) -> Result<Vec<Listing>, RepositoryError> {
        with_table!(self.kind, table => {
            table::Entity::find()
                .filter(table::Column::SellerId.eq(seller_id.0))
                .order_by_asc(table::Column::CreatedAt)
                .all(self.db.as_ref())
                .await
                .map_err(repository_error)?
                .into_iter()
                .map(table::Model::into_listing)
                .collect()
        })
    }
}
