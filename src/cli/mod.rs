//! Command-line interface module
//! 
//! Handles argument parsing and CLI commands

pub mod args;
pub mod commands;

pub use args::*;
pub use commands::*;
