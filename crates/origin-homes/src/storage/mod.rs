//! Relational persistence for both listing tables.

pub mod entity;
pub mod memory;
pub mod seaorm;

pub use memory::InMemoryListingRepository;
pub use sea_orm::DatabaseConnection;
pub use seaorm::SeaOrmListingRepository;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbErr, Schema};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::listings::ListingKind;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database connection failed: {0}")]
    Connect(String),
    #[error("failed to create table {table}: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: DbErr,
    },
    #[error("failed to close database: {0}")]
    Close(#[source] DbErr),
}

/// Opens the connection pool. The URL is never logged.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, StorageError> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .map_err(|err| StorageError::Connect(err.to_string()))?;
    info!(max_connections = config.max_connections, "database connected");
    Ok(db)
}

/// Creates the sale and rental tables when they do not exist yet.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), StorageError> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let tables = [
        (
            ListingKind::Sale.table_name(),
            schema.create_table_from_entity(entity::sale_property::Entity),
        ),
        (
            ListingKind::Rental.table_name(),
            schema.create_table_from_entity(entity::rental_property::Entity),
        ),
    ];

    for (table, mut statement) in tables {
        statement.if_not_exists();
        db.execute(backend.build(&statement))
            .await
            .map_err(|source| StorageError::Schema { table, source })?;
        info!(table, "listing table ready");
    }
    Ok(())
}

pub async fn close(db: DatabaseConnection) -> Result<(), StorageError> {
    db.close().await.map_err(StorageError::Close)
}
