//! System abstraction for filesystem operations
//!
//! Every read and write the config handler performs goes through the
//! [`System`] trait, so tests can swap the real filesystem for an
//! in-memory one.

use std::io;
use std::path::Path;

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Permission bits applied to files written by [`RealSystem`]
pub const FILE_MODE: u32 = 0o644;

/// Unified trait for system operations
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs`
/// - `MockSystem`: Test implementation using in-memory storage
pub trait System: Send + Sync {
    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the file's contents with `contents` in a single write,
    /// creating it if it doesn't exist
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}
