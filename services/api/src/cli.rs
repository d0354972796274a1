use crate::server;
use clap::{Args, Parser, Subcommand};
use origin_homes::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "origin-homes",
    about = "Serve and administer the Origin Homes property listing API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Manage the listing tables
    Schema {
        #[command(subcommand)]
        command: SchemaCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SchemaCommand {
    /// Create the sale and rental tables if they do not exist
    Sync,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Create missing listing tables before accepting requests
    #[arg(long)]
    pub(crate) sync_schema: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Schema {
            command: SchemaCommand::Sync,
        } => server::sync_schema().await,
    }
}
