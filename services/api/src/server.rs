use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use origin_homes::config::{AppConfig, ConfigError};
use origin_homes::error::AppError;
use origin_homes::listings::{property_router, ListingKind, ListingService};
use origin_homes::media::CloudinaryClient;
use origin_homes::storage::{self, DatabaseConnection, SeaOrmListingRepository};
use origin_homes::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

type Service = ListingService<SeaOrmListingRepository, CloudinaryClient>;

fn listing_service(
    kind: ListingKind,
    db: &Arc<DatabaseConnection>,
    media: &Arc<CloudinaryClient>,
) -> Arc<Service> {
    Arc::new(ListingService::new(
        kind,
        Arc::new(SeaOrmListingRepository::new(Arc::clone(db), kind)),
        media.clone(),
    ))
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let media_config = config.media.clone().ok_or(ConfigError::MissingVar {
        name: "CLOUDINARY_CLOUD_NAME",
    })?;
    let media = Arc::new(CloudinaryClient::new(media_config)?);

    let db = storage::connect(&config.database).await?;
    if args.sync_schema {
        storage::sync_schema(&db).await?;
    }
    let db = Arc::new(db);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let listings = property_router(
        listing_service(ListingKind::Sale, &db, &media),
        listing_service(ListingKind::Rental, &db, &media),
    );
    let app = with_operational_routes(listings)
        .layer(DefaultBodyLimit::max(config.server.upload_limit_bytes))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "property listing service ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    readiness_flag.store(false, Ordering::Release);
    // The router and its services are gone once serve returns.
    match Arc::into_inner(db) {
        Some(db) => storage::close(db).await?,
        None => warn!("database still shared at shutdown; leaving the pool to drop"),
    }
    info!("property listing service stopped");
    Ok(())
}

pub(crate) async fn sync_schema() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let db = storage::connect(&config.database).await?;
    storage::sync_schema(&db).await?;
    storage::close(db).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested, draining connections");
}
