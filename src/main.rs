//! fielddb - Application entry point
//!
//! CLI-based entry point that dispatches to the bootstrap, migration,
//! server and maintenance commands.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fielddb::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Bootstrap => commands::bootstrap::execute(&config)
            .await
            .map_err(|e| e.to_string()),
        Commands::Migrate(args) => commands::migrate::execute(args, &config)
            .await
            .map_err(|e| e.to_string()),
        Commands::Serve(args) => commands::serve::execute(args, config)
            .await
            .map_err(|e| e.to_string()),
        Commands::Media(args) => commands::media::execute(args, &config)
            .await
            .map_err(|e| e.to_string()),
        Commands::Mail(args) => commands::mail::execute(args, &config)
            .await
            .map_err(|e| e.to_string()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
