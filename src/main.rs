//! Memkeep - session memory MCP server
//!
#![doc = "Main entry point for the Memkeep server binary."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memkeep::cli::{Cli, Commands};
use memkeep::config::Config;
use memkeep::server;
use memkeep::storage::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve => {
            let data_dir = config.data_dir()?;
            tracing::info!("Starting session memory server");
            tracing::info!("Data directory: {}", data_dir.display());

            let store = SessionStore::new(data_dir)?;
            server::run(&config, store).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Log output goes to stderr; stdout is reserved for the JSON-RPC channel.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "memkeep=debug" } else { "memkeep=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
