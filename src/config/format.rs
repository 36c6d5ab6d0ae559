//! File format detection and the per-format codecs

use core::fmt;
use std::path::Path;

use crate::error::{Result, StarterError};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Textual formats a config file can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FileFormat {
    /// `.json`, written with 2-space indentation
    Json,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl FileFormat {
    /// Resolve the format from a path's extension
    ///
    /// Matching is exact: `cfg.JSON` is not recognised.
    #[must_use]
    #[inline]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Decode `content` into `T`
    ///
    /// # Errors
    ///
    /// Returns a format error if `content` does not parse as this format
    /// or does not match the shape of `T`.
    #[inline]
    pub fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        match self {
            Self::Json => serde_json::from_str(content)
                .map_err(|e| StarterError::format(format!("invalid JSON: {e}"))),
            Self::Yaml => serde_yaml::from_str(content)
                .map_err(|e| StarterError::format(format!("invalid YAML: {e}"))),
            Self::Toml => toml::from_str(content)
                .map_err(|e| StarterError::format(format!("invalid TOML: {e}"))),
        }
    }

    /// Encode `value` into a complete document
    ///
    /// # Errors
    ///
    /// Returns a format error if the value cannot be represented in this
    /// format (for example a null or a bare scalar in TOML).
    #[inline]
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(value)
                .map_err(|e| StarterError::format(format!("cannot encode JSON: {e}"))),
            Self::Yaml => serde_yaml::to_string(value)
                .map_err(|e| StarterError::format(format!("cannot encode YAML: {e}"))),
            Self::Toml => toml::to_string(value)
                .map_err(|e| StarterError::format(format!("cannot encode TOML: {e}"))),
        }
    }
}

impl fmt::Display for FileFormat {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
            Self::Toml => f.write_str("toml"),
        }
    }
}

/// Format error for a path whose extension is not in the dispatch table
pub(crate) fn unsupported_extension(path: &Path) -> StarterError {
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    StarterError::format(format!("unsupported file extension \"{ext}\""))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn detects_formats_by_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a/cfg.json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("cfg.yaml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("cfg.yml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("cfg.toml")), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_path(Path::new("cfg.ini")), None);
        assert_eq!(FileFormat::from_path(Path::new("cfg.JSON")), None);
        assert_eq!(FileFormat::from_path(Path::new("config")), None);
    }

    #[test]
    fn json_output_uses_two_space_indent() {
        let out = FileFormat::Json.encode(&json!({"name": "a", "count": 7})).unwrap();
        assert_eq!(out, "{\n  \"name\": \"a\",\n  \"count\": 7\n}");
    }

    #[test]
    fn malformed_yaml_is_format_error() {
        let err = FileFormat::Yaml.decode::<Value>("a: [1, 2").unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn unsupported_extension_names_the_extension() {
        let err = unsupported_extension(Path::new("settings.ini"));
        assert_eq!(
            err.to_string(),
            "Format error: unsupported file extension \".ini\""
        );
    }
}
