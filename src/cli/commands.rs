//! CLI command implementations

use core::str::FromStr;

use crate::cli::ListArgs;
use crate::config::{ConfigHandler, deep_merge, merge_plugin_config};
use crate::error::StarterError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde_json::{Map, Value};
use tracing::info;

/// Output format for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutputFormat {
    /// One `key = value` line per entry
    Plain,
    /// Pretty-printed JSON object
    Json,
    /// YAML mapping
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = StarterError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            _ => Err(StarterError::configuration(format!(
                "Invalid output format: {s}. Use 'plain', 'json' or 'yaml'"
            ))),
        }
    }
}

/// Render one page of the config file's top-level entries
///
/// Entries are sorted by key, filtered by `search`, then paginated.
///
/// # Errors
///
/// Returns an error if:
/// - The output format, page or limit is invalid
/// - The config file cannot be loaded
#[inline]
pub fn list(system: &dyn System, config_path: &str, args: &ListArgs) -> Result<String> {
    let format = args.output.parse::<OutputFormat>()?;
    if args.page == 0 || args.limit == 0 {
        return Err(StarterError::configuration("--page and --limit must be at least 1").into());
    }

    let mut settings = Map::new();
    ConfigHandler::new(system, config_path, &mut settings)
        .load()
        .with_context(|| format!("Failed to load configuration file: {config_path}"))?;

    let needle = args.search.as_deref().map(str::to_lowercase);
    let mut entries: Vec<(String, Value)> = settings
        .into_iter()
        .filter(|(key, _)| {
            needle
                .as_deref()
                .is_none_or(|n| key.to_lowercase().contains(n))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let page: Map<String, Value> = entries
        .into_iter()
        .skip((args.page - 1).saturating_mul(args.limit))
        .take(args.limit)
        .collect();

    render(&page, format)
}

fn render(page: &Map<String, Value>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => {
            if page.is_empty() {
                return Ok("No entries found".to_owned());
            }
            let lines: Vec<String> = page
                .iter()
                .map(|(key, value)| format!("{key} = {value}"))
                .collect();
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(page).context("Failed to render entries as JSON")
        }
        OutputFormat::Yaml => {
            let out = serde_yaml::to_string(page).context("Failed to render entries as YAML")?;
            Ok(out.trim_end().to_owned())
        }
    }
}

/// Merge `KEY=VALUE` pairs into the config file
///
/// # Errors
///
/// Returns an error if:
/// - A pair is malformed or two pairs conflict
/// - The config file cannot be read, merged or written
#[inline]
pub fn set(system: &dyn System, config_path: &str, pairs: &[String]) -> Result<()> {
    let mut overlay = parse_settings(pairs)?;

    ConfigHandler::new(system, config_path, &mut overlay)
        .save()
        .with_context(|| format!("Failed to update configuration file: {config_path}"))?;

    info!("Updated {} setting(s) in {config_path}", count_leaves(&overlay));
    Ok(())
}

/// Store a plugin's JSON configuration under `plugins.<name>`
///
/// # Errors
///
/// Returns an error if:
/// - `config_json` is not valid JSON
/// - The config file is not JSON or cannot be read or written
#[inline]
pub fn plugin(system: &dyn System, config_path: &str, name: &str, config_json: &str) -> Result<()> {
    let cfg: Value = serde_json::from_str(config_json).map_err(|e| {
        StarterError::configuration(format!("Invalid JSON for plugin '{name}': {e}"))
    })?;

    merge_plugin_config(system, name, config_path, &cfg)
        .with_context(|| format!("Failed to merge plugin '{name}' into {config_path}"))?;

    info!("Stored configuration for plugin '{name}' in {config_path}");
    Ok(())
}

/// Build an overlay tree from `KEY=VALUE` pairs
///
/// # Errors
///
/// Returns an error if a pair has no `=`, a key segment is empty, or two
/// pairs put a table and a value at the same key.
#[inline]
pub fn parse_settings(pairs: &[String]) -> Result<Map<String, Value>, StarterError> {
    let mut overlay = Map::new();

    for pair in pairs {
        let (key, raw) = parse_key_value(pair)?;
        if key.split('.').any(str::is_empty) {
            return Err(StarterError::configuration(format!(
                "Invalid key '{key}' in '{pair}'"
            )));
        }

        let mut value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        if holds_null(&value) {
            return Err(StarterError::configuration(format!(
                "Value for '{key}' is or contains null; use '{key}=\"null\"' to store the text"
            )));
        }
        for segment in key.rsplit('.') {
            let mut table = Map::new();
            table.insert(segment.to_owned(), value);
            value = Value::Object(table);
        }

        if let Value::Object(tree) = value {
            deep_merge(&mut overlay, tree)?;
        }
    }

    Ok(overlay)
}

/// Null values are skipped when merging, so they can never be written
fn holds_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(table) => table.values().any(holds_null),
        _ => false,
    }
}

/// Number of non-table values in `tree`
fn count_leaves(tree: &Map<String, Value>) -> usize {
    tree.values()
        .map(|value| match value {
            Value::Object(nested) => count_leaves(nested),
            _ => 1,
        })
        .sum()
}

/// Parse KEY=VALUE string
fn parse_key_value(arg: &str) -> Result<(&str, &str), StarterError> {
    arg.split_once('=').ok_or_else(|| {
        StarterError::configuration(format!("Invalid setting format '{arg}'. Expected KEY=VALUE"))
    })
}
