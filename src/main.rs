//! # `clistarter`
//!
//! A starter command-line tool whose settings live in a single JSON, YAML or
//! TOML file. Updates are merged into the file, so keys written by other
//! tools or plugins survive.
//!
//! ## Usage
//!
//! ```sh
//! clistarter --config settings.yaml list --search server -o json
//! clistarter --config settings.toml set server.port=8080 name=demo
//! clistarter --config settings.json plugin metrics '{"enabled":true}'
//! ```
//!
//! See `clistarter --help` for more options and details.

use anyhow::Result;
use clap::Parser as _;
use clistarter::cli::Args;
use clistarter::error::StarterError;
use clistarter::system::RealSystem;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber based on verbose flag
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    let system = RealSystem::new();
    match clistarter::run(&args, &system) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<StarterError>()
                    .map_or(1, StarterError::exit_code),
            );
        }
    }
}
