//! `clistarter` - A starter kit for command-line tools
//!
//! This library provides a config file handler that loads and saves a
//! caller-owned value as JSON, YAML or TOML, merging saves into the
//! existing file, plus the command implementations of the starter CLI.

pub mod cli;
pub mod config;
pub mod error;
pub mod system;

use anyhow::Result;
use cli::{Args, Command};
use system::System;

/// Main entry point for the clistarter library
///
/// Output meant for the user (the `list` page) is printed to stdout.
///
/// # Errors
///
/// Returns the failing command's error.
pub fn run(args: &Args, system: &dyn System) -> Result<()> {
    match &args.command {
        Command::List(list_args) => {
            let output = cli::list(system, &args.config, list_args)?;
            // Output to stdout (not using logging)
            println!("{output}");
            Ok(())
        }
        Command::Set(set_args) => cli::set(system, &args.config, &set_args.pairs),
        Command::Plugin(plugin_args) => cli::plugin(
            system,
            &args.config,
            &plugin_args.name,
            &plugin_args.config,
        ),
    }
}
