/*!
 * filemap - Walk directory trees into index-aware, flattenable file maps
 *
 * A directory is walked through a pluggable filesystem backend into a raw map,
 * every directory then takes the data of its index file, and the resulting
 * tree can be renamed, flattened into index-addressed records and rebuilt.
 */

pub mod cancel;
pub mod config;
pub mod directory;
pub mod document;
pub mod error;
pub mod file_map;
pub mod flatten;
pub mod fs;
pub mod index;
pub mod listing;
pub mod path;
pub mod report;
pub mod resolver;
pub mod types;
pub mod utils;
pub mod walker;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use cancel::{CancelSignal, Canceller, SubscriptionId};
pub use config::Config;
pub use directory::{
    format_errors, parse_directory, IndexFileResolver, ParseDirectoryOptions,
    ParseDirectoryResult,
};
pub use document::{parse_document, Document, DocumentError, DocumentParseResult};
pub use error::{FileMapError, Result};
pub use file_map::FileMap;
pub use flatten::{compare_by_path, flatten, flatten_by, sort_flattened, unflatten};
pub use fs::{DiskFs, FsModule, MemoryFs};
pub use index::FileMapPathIndex;
pub use resolver::{create_file_map, CreateFileMapOptions};
pub use types::{
    FileMapItem, FlattenedFileMap, FlattenedFileMapItem, FsFileMap, FsFileMapItem, FsFileOptions,
    NodeId,
};
pub use walker::{walk_directory, WalkOptions};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
