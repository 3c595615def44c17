/*!
 * Filesystem abstraction consumed by the directory walker
 */

mod disk;
mod memory;

pub use disk::DiskFs;
pub use memory::MemoryFs;

use std::io;

/// Capability set the walker needs from a filesystem
///
/// Paths are plain strings so that virtual filesystems are not tied to the
/// host's path rules. Implementations must be usable from several worker
/// threads at once.
pub trait FsModule: Send + Sync {
    /// Last segment of a path
    fn get_basename(&self, path: &str) -> String;

    /// Join a directory path and an entry name; an empty base yields the name
    fn join_path(&self, base: &str, name: &str) -> String;

    /// Absolute, canonical form of a path
    fn resolve_path(&self, path: &str) -> io::Result<String>;

    /// Whether the path exists and is a directory
    fn is_directory(&self, path: &str) -> io::Result<bool>;

    /// Names of the immediate entries of a directory
    fn read_directory(&self, path: &str) -> io::Result<Vec<String>>;

    /// Contents of a file as text
    fn read_file(&self, path: &str) -> io::Result<String>;
}

impl<F: FsModule + ?Sized> FsModule for &F {
    fn get_basename(&self, path: &str) -> String {
        (**self).get_basename(path)
    }

    fn join_path(&self, base: &str, name: &str) -> String {
        (**self).join_path(base, name)
    }

    fn resolve_path(&self, path: &str) -> io::Result<String> {
        (**self).resolve_path(path)
    }

    fn is_directory(&self, path: &str) -> io::Result<bool> {
        (**self).is_directory(path)
    }

    fn read_directory(&self, path: &str) -> io::Result<Vec<String>> {
        (**self).read_directory(path)
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        (**self).read_file(path)
    }
}
