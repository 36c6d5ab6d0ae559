use clap::{Parser, Subcommand};

/// Command-line arguments for clistarter
#[derive(Parser, Debug, Clone)]
#[command(name = "clistarter")]
#[command(about = "A starter command-line tool backed by a JSON, YAML or TOML config file")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Configuration file path (.json, .yaml, .yml or .toml)
    #[arg(long, value_name = "PATH", default_value = "./config.json", global = true)]
    pub config: String,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the root command
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the top-level settings of the config file
    List(ListArgs),

    /// Update settings, keeping every other key in the file
    Set(SetArgs),

    /// Write a plugin's section into a JSON config file
    Plugin(PluginArgs),
}

/// Arguments for `list`
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Output format: plain, json or yaml
    #[arg(short = 'o', long = "output", value_name = "FORMAT", default_value = "plain")]
    pub output: String,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Number of entries per page
    #[arg(long, default_value_t = 100)]
    pub limit: usize,

    /// Only show keys containing this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}

/// Arguments for `set`
#[derive(Parser, Debug, Clone)]
pub struct SetArgs {
    /// Settings in KEY=VALUE format; dotted keys address nested tables
    /// and VALUE is read as JSON when it parses, otherwise as a string
    #[arg(value_name = "KEY=VALUE", required = true)]
    pub pairs: Vec<String>,
}

/// Arguments for `plugin`
#[derive(Parser, Debug, Clone)]
pub struct PluginArgs {
    /// Plugin name, used as the key under `plugins`
    pub name: String,

    /// Plugin configuration as JSON
    #[arg(value_name = "JSON")]
    pub config: String,
}
