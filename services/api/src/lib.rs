mod cli;
mod infra;
mod routes;
mod server;

use origin_homes::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
