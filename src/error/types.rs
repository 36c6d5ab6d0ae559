//! Custom error types with exit codes

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for clistarter operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StarterError {
    /// Configuration Error - invalid command-line usage or caller input
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O Error - the config file could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Format Error - unsupported extension or malformed content
    #[error("Format error: {message}")]
    Format { message: String },

    /// Merge Error - the overlay does not fit the on-disk document
    #[error("Merge error: {message}")]
    Merge { message: String },
}

impl StarterError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::Io { .. } => 2,
            Self::Format { .. } => 3,
            Self::Merge { .. } => 4,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap an I/O failure on `path`
    #[inline]
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a format error
    #[inline]
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a merge error
    #[inline]
    pub fn merge<S: Into<String>>(message: S) -> Self {
        Self::Merge {
            message: message.into(),
        }
    }

    /// True for I/O failures
    #[must_use]
    #[inline]
    pub const fn is_io(&self) -> bool {
        matches!(*self, Self::Io { .. })
    }

    /// True for format failures
    #[must_use]
    #[inline]
    pub const fn is_format(&self) -> bool {
        matches!(*self, Self::Format { .. })
    }

    /// True for merge failures
    #[must_use]
    #[inline]
    pub const fn is_merge(&self) -> bool {
        matches!(*self, Self::Merge { .. })
    }
}

/// Result alias used throughout the library
pub type Result<T, E = StarterError> = core::result::Result<T, E>;
