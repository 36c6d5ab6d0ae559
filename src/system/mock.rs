//! Mock system implementation for testing

use super::System;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem,
/// perfect for fast, isolated unit tests without side effects.
///
/// # Example
/// ```
/// use clistarter::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_file("/test/cfg.json", b"{}").unwrap();
///
/// assert_eq!(system.read_to_string(Path::new("/test/cfg.json")).unwrap(), "{}");
/// ```
#[derive(Clone, Default)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

#[derive(Default)]
struct MockSystemState {
    files: HashMap<PathBuf, Vec<u8>>,
    read_only: Vec<PathBuf>,
    writes: usize,
}

impl MockSystem {
    /// Create a new, empty `MockSystem`
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state
            .files
            .insert(path.as_ref().to_path_buf(), contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Make writes to `path` fail with `PermissionDenied` (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_read_only<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.read_only.push(path.as_ref().to_path_buf());
        drop(state);
        Ok(self)
    }

    /// Current contents of `path`, if present and valid UTF-8
    #[must_use]
    #[inline]
    pub fn contents(&self, path: &str) -> Option<String> {
        self.read_to_string(Path::new(path)).ok()
    }

    /// Number of successful writes performed so far
    #[must_use]
    #[inline]
    pub fn write_count(&self) -> usize {
        self.state.read().map_or(0, |state| state.writes)
    }
}

impl System for MockSystem {
    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if state.read_only.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", path.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        state.writes += 1;
        drop(state);
        Ok(())
    }
}
