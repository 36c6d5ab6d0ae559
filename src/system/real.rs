//! Real system implementation using `std::fs`

use super::{FILE_MODE, System};
use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::Path;

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library's
/// filesystem functions.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        return Self;
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RealSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt as _;
            options.mode(FILE_MODE);
        }
        #[cfg(not(unix))]
        let _ = FILE_MODE;

        let mut file = options.open(path)?;
        file.write_all(contents)?;
        file.flush()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_replaces_existing_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.json");
        let system = RealSystem::new();

        system.write(&path, b"{\"a\": 1, \"long\": true}").unwrap();
        system.write(&path, b"{}").unwrap();

        assert_eq!(system.read_to_string(&path).unwrap(), "{}");
    }

    #[cfg(unix)]
    #[test]
    fn new_files_get_owner_write_mode() {
        use std::os::unix::fs::PermissionsExt as _;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.yaml");
        RealSystem::new().write(&path, b"a: 1\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        // umask may only clear bits
        assert_eq!(mode & 0o777 & !FILE_MODE, 0);
        assert_ne!(mode & 0o600, 0);
    }
}
