//! Command line interface for the moving-features server.

#![deny(
    elided_lifetimes_in_paths,
    missing_debug_implementations,
    non_ascii_idents,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

mod error;
mod serve;

pub use error::Error;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// A crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// mf: a command line interface for the moving-features server.
#[derive(Debug, Parser)]
pub struct Mf {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the API.
    Serve(serve::Args),
}

impl Mf {
    /// Runs the parsed command.
    pub async fn run(self) -> Result<()> {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        tracing_subscriber::fmt().with_env_filter(filter).init();
        match self.command {
            Command::Serve(args) => serve::run(args).await,
        }
    }
}
