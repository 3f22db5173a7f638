//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Field database instance management
#[derive(Parser, Debug)]
#[command(name = "fielddb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the first-run bootstrap (no-op once completed)
    Bootstrap,

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Bootstrap, then start the HTTP server
    Serve(ServeArgs),

    /// Media file utilities
    Media(MediaArgs),

    /// Email utilities
    Mail(MailArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (overrides SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop all tables (including the bootstrap marker) and re-run all migrations
    Fresh,
}

/// Arguments for the media command
#[derive(Parser, Debug)]
pub struct MediaArgs {
    #[command(subcommand)]
    pub action: MediaAction,
}

#[derive(Subcommand, Debug)]
pub enum MediaAction {
    /// Create the reduced-size copy of a stored file
    Reduce {
        /// Path of the original file
        path: PathBuf,
    },
}

/// Arguments for the mail command
#[derive(Parser, Debug)]
pub struct MailArgs {
    #[command(subcommand)]
    pub action: MailAction,
}

#[derive(Subcommand, Debug)]
pub enum MailAction {
    /// Send a test message through the configured relay
    Test {
        /// Recipient address
        to: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["fielddb", "-v", "serve", "-H", "127.0.0.1", "-p", "8080"]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
                assert_eq!(args.port, Some(8080));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_media_reduce() {
        let cli = Cli::parse_from(["fielddb", "media", "reduce", "store/files/a.wav"]);
        assert!(matches!(
            cli.command,
            Commands::Media(MediaArgs {
                action: MediaAction::Reduce { .. }
            })
        ));
    }
}
