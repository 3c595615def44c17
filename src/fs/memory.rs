/*!
 * In-memory filesystem backend
 *
 * Useful for tests and for feeding generated content through the walker
 * without touching the disk. All paths are `/`-separated; relative paths are
 * resolved against the virtual root `/`.
 */

use std::collections::BTreeMap;
use std::io;

use super::FsModule;
use crate::path::path_to_path_parts;

#[derive(Debug, Clone)]
enum MemoryEntry {
    File(String),
    Directory(BTreeMap<String, MemoryEntry>),
}

/// `FsModule` holding a tree of directories and text files in memory
#[derive(Debug, Clone)]
pub struct MemoryFs {
    root: BTreeMap<String, MemoryEntry>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create an empty filesystem containing only the root directory
    pub fn new() -> Self {
        Self {
            root: BTreeMap::new(),
        }
    }

    /// Add a file, creating missing parent directories
    ///
    /// Replaces an existing file at the same path. Fails if a parent segment
    /// is a file or if the path itself names a directory.
    pub fn add_file(&mut self, path: &str, contents: impl Into<String>) -> io::Result<()> {
        let mut parts = normalize(path);
        let name = parts
            .pop()
            .ok_or_else(|| invalid_input(format!("cannot create a file at '{}'", path)))?;
        let dir = self.ensure_directory(&parts, path)?;
        if let Some(MemoryEntry::Directory(_)) = dir.get(&name) {
            return Err(invalid_input(format!("'{}' is a directory", path)));
        }
        dir.insert(name, MemoryEntry::File(contents.into()));
        Ok(())
    }

    /// Add a directory and any missing parents
    pub fn add_directory(&mut self, path: &str) -> io::Result<()> {
        let parts = normalize(path);
        self.ensure_directory(&parts, path).map(|_| ())
    }

    /// Builder form of [`MemoryFs::add_file`]
    pub fn with_file(mut self, path: &str, contents: impl Into<String>) -> io::Result<Self> {
        self.add_file(path, contents)?;
        Ok(self)
    }

    /// Builder form of [`MemoryFs::add_directory`]
    pub fn with_directory(mut self, path: &str) -> io::Result<Self> {
        self.add_directory(path)?;
        Ok(self)
    }

    fn ensure_directory(
        &mut self,
        parts: &[String],
        original: &str,
    ) -> io::Result<&mut BTreeMap<String, MemoryEntry>> {
        let mut current = &mut self.root;
        for part in parts {
            let entry = current
                .entry(part.clone())
                .or_insert_with(|| MemoryEntry::Directory(BTreeMap::new()));
            current = match entry {
                MemoryEntry::Directory(children) => children,
                MemoryEntry::File(_) => {
                    return Err(invalid_input(format!(
                        "'{}' has a file where a directory is expected",
                        original
                    )))
                }
            };
        }
        Ok(current)
    }

    fn lookup(&self, path: &str) -> Option<&MemoryEntry> {
        let parts = normalize(path);
        let mut current = &self.root;
        let (last, dirs) = match parts.split_last() {
            Some(split) => split,
            None => return None,
        };
        for part in dirs {
            match current.get(part) {
                Some(MemoryEntry::Directory(children)) => current = children,
                _ => return None,
            }
        }
        current.get(last)
    }

    fn is_root(path: &str) -> bool {
        normalize(path).is_empty()
    }
}

impl FsModule for MemoryFs {
    fn get_basename(&self, path: &str) -> String {
        normalize(path).pop().unwrap_or_default()
    }

    fn join_path(&self, base: &str, name: &str) -> String {
        let name = name.trim_start_matches('/');
        if base.is_empty() {
            return name.to_string();
        }
        format!("{}/{}", base.trim_end_matches('/'), name)
    }

    fn resolve_path(&self, path: &str) -> io::Result<String> {
        Ok(format!("/{}", normalize(path).join("/")))
    }

    fn is_directory(&self, path: &str) -> io::Result<bool> {
        if Self::is_root(path) {
            return Ok(true);
        }
        Ok(matches!(self.lookup(path), Some(MemoryEntry::Directory(_))))
    }

    fn read_directory(&self, path: &str) -> io::Result<Vec<String>> {
        let children = if Self::is_root(path) {
            &self.root
        } else {
            match self.lookup(path) {
                Some(MemoryEntry::Directory(children)) => children,
                Some(MemoryEntry::File(_)) => {
                    return Err(invalid_input(format!("'{}' is not a directory", path)))
                }
                None => return Err(not_found(path)),
            }
        };
        Ok(children.keys().cloned().collect())
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        match self.lookup(path) {
            Some(MemoryEntry::File(contents)) => Ok(contents.clone()),
            Some(MemoryEntry::Directory(_)) => {
                Err(invalid_input(format!("'{}' is a directory", path)))
            }
            None => Err(not_found(path)),
        }
    }
}

/// Path segments with `.` removed and `..` applied
fn normalize(path: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for part in path_to_path_parts(path) {
        match part.as_str() {
            "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    parts
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("'{}' not found", path))
}

fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
