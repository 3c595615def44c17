/*!
 * Host filesystem backend
 */

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::trace;
use walkdir::WalkDir;

use super::FsModule;

/// `FsModule` backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl DiskFs {
    /// Create a new disk backend
    pub fn new() -> Self {
        Self
    }
}

impl FsModule for DiskFs {
    fn get_basename(&self, path: &str) -> String {
        Path::new(path)
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    fn join_path(&self, base: &str, name: &str) -> String {
        if base.is_empty() {
            return name.to_string();
        }
        Path::new(base).join(name).to_string_lossy().to_string()
    }

    fn resolve_path(&self, path: &str) -> io::Result<String> {
        let path = Path::new(path);
        let resolved = match fs::canonicalize(path) {
            Ok(p) => p,
            // Missing paths still get an absolute form so the caller can report absence
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    env::current_dir()?.join(path)
                }
            }
            Err(e) => return Err(e),
        };
        Ok(path_to_string(resolved))
    }

    // Symlinks are never directories, so a link back to an ancestor cannot loop
    fn is_directory(&self, path: &str) -> io::Result<bool> {
        match fs::symlink_metadata(path) {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Entry names, leaving out symlinks that do not lead to a regular file
    fn read_directory(&self, path: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.path_is_symlink() && !fs::metadata(entry.path()).is_ok_and(|m| m.is_file()) {
                trace!("skipping symlink {}", entry.path().display());
                continue;
            }
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }

    /// File contents; invalid UTF-8 is replaced rather than rejected
    fn read_file(&self, path: &str) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                trace!("{} is not valid UTF-8, decoding lossily", path);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        })
    }
}

fn path_to_string(path: PathBuf) -> String {
    path.to_string_lossy().to_string()
}
