//! FileSystem trait definition

use std::io;
use std::path::Path;

/// Abstraction over the file system operations the scanner needs, for testability.
///
/// Reads are one-shot: an implementation opens, reads and closes the file inside
/// `read_to_string`, so no handle outlives the call.
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Read file contents as UTF-8
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}
