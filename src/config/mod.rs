//! Configuration management module
//!
//! Binds an in-memory config value to a JSON, YAML or TOML file. Loading
//! replaces the value with the file's contents; saving merges the value
//! into whatever is already on disk so fields the value does not model
//! are kept.

pub mod format;
pub mod merge;
pub mod plugin;

pub use format::FileFormat;
pub use merge::{MergeTable, deep_merge};
pub use plugin::merge_plugin_config;

use crate::error::{Result, StarterError};
use crate::system::System;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads and writes one config file on behalf of a caller-owned value
///
/// The file format is fixed from the path's extension when the handler is
/// created and used for both directions.
///
/// # Example
/// ```
/// use clistarter::config::ConfigHandler;
/// use clistarter::system::MockSystem;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Settings {
///     count: u32,
/// }
///
/// let system = MockSystem::new()
///     .with_file("/cfg.json", br#"{"name":"a","count":5}"#).unwrap();
///
/// let mut settings = Settings::default();
/// let mut handler = ConfigHandler::new(&system, "/cfg.json", &mut settings);
/// handler.load().unwrap();
/// handler.config_mut().count = 7;
/// handler.save().unwrap();
///
/// assert_eq!(
///     system.contents("/cfg.json").unwrap(),
///     "{\n  \"name\": \"a\",\n  \"count\": 7\n}"
/// );
/// ```
pub struct ConfigHandler<'a, T> {
    system: &'a dyn System,
    path: PathBuf,
    format: Option<FileFormat>,
    cfg: &'a mut T,
}

impl<'a, T> ConfigHandler<'a, T> {
    /// Bind `cfg` to the file at `path`
    ///
    /// Performs no I/O. An unsupported extension is only reported by
    /// [`load`](Self::load) and [`save`](Self::save).
    #[inline]
    pub fn new<P: Into<PathBuf>>(system: &'a dyn System, path: P, cfg: &'a mut T) -> Self {
        let path = path.into();
        let format = FileFormat::from_path(&path);
        debug!(path = %path.display(), ?format, "created config handler");
        Self {
            system,
            path,
            format,
            cfg,
        }
    }

    /// Path of the bound file
    #[must_use]
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format resolved from the extension, if supported
    #[must_use]
    #[inline]
    pub const fn format(&self) -> Option<FileFormat> {
        self.format
    }

    /// The bound config value
    #[must_use]
    #[inline]
    pub fn config(&self) -> &T {
        &*self.cfg
    }

    /// Mutable access to the bound config value
    #[inline]
    pub fn config_mut(&mut self) -> &mut T {
        &mut *self.cfg
    }

    fn read(&self) -> Result<String> {
        self.system
            .read_to_string(&self.path)
            .map_err(|e| StarterError::io(&self.path, e))
    }

    fn require_format(&self) -> Result<FileFormat> {
        self.format
            .ok_or_else(|| format::unsupported_extension(&self.path))
    }
}

impl<T: Serialize + DeserializeOwned> ConfigHandler<'_, T> {
    /// Replace the config value with the file's contents
    ///
    /// The value is left untouched when any step fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (I/O error)
    /// - The extension is unsupported or the content does not decode into `T` (format error)
    #[inline]
    pub fn load(&mut self) -> Result<()> {
        debug!(path = %self.path.display(), "loading config");
        let content = self.read()?;
        let format = self.require_format()?;

        *self.cfg = format.decode(&content)?;

        debug!(path = %self.path.display(), %format, "loaded config");
        Ok(())
    }

    /// Merge the config value into the file on disk
    ///
    /// Keys the value does not carry are preserved, nested tables are
    /// merged, and sequences are replaced wholesale. The merged document is
    /// encoded in full before the file is written, so a failure at any
    /// step leaves the file unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or written (I/O error)
    /// - The extension is unsupported, the current content is malformed, or
    ///   the merged document cannot be encoded (format error)
    /// - The value is not a key-value tree or conflicts structurally with
    ///   the document (merge error)
    #[inline]
    pub fn save(&self) -> Result<()> {
        debug!(path = %self.path.display(), "saving config");
        let content = self.read()?;
        let format = self.require_format()?;

        let buf = match format {
            FileFormat::Json => {
                let src = serde_json::to_value(&*self.cfg).map_err(conversion_error)?;
                self.merged::<serde_json::Map<String, serde_json::Value>>(format, &content, src)?
            }
            FileFormat::Yaml => {
                let src = serde_yaml::to_value(&*self.cfg).map_err(conversion_error)?;
                self.merged::<serde_yaml::Mapping>(format, &content, src)?
            }
            FileFormat::Toml => {
                let src = toml::Value::try_from(&*self.cfg).map_err(conversion_error)?;
                self.merged::<toml::Table>(format, &content, src)?
            }
        };

        self.system
            .write(&self.path, buf.as_bytes())
            .map_err(|e| StarterError::io(&self.path, e))?;

        debug!(path = %self.path.display(), %format, bytes = buf.len(), "saved config");
        Ok(())
    }

    /// Merge `src` into the decoded `content` and encode the result
    fn merged<M>(&self, format: FileFormat, content: &str, src: M::Value) -> Result<String>
    where
        M: MergeTable + Default + Serialize,
        M::Value: DeserializeOwned,
    {
        let mut dst = if content.trim().is_empty() {
            M::default()
        } else {
            let current = format.decode::<M::Value>(content)?;
            if M::is_null(&current) {
                M::default()
            } else {
                M::from_value(current).map_err(|_| {
                    StarterError::format(format!(
                        "{} does not hold a key-value document",
                        self.path.display()
                    ))
                })?
            }
        };

        let src = M::from_value(src).map_err(|_| {
            StarterError::merge("config value does not convert to a key-value tree")
        })?;

        deep_merge(&mut dst, src)?;
        format.encode(&dst)
    }
}

fn conversion_error<E: core::fmt::Display>(e: E) -> StarterError {
    StarterError::merge(format!("cannot convert config value: {e}"))
}
