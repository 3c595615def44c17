/*!
 * Core types and data structures for file maps
 */

use std::collections::BTreeMap;

use serde::Serialize;

/// Information handed to directory and file filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsFileOptions {
    /// Absolute path of the entry
    pub absolute_path: String,
    /// Path relative to the walk root (empty for the root itself)
    pub relative_path: String,
    /// Base name of the entry
    pub name: String,
}

/// Raw tree produced by the walker: entry name to item
pub type FsFileMap<T> = BTreeMap<String, FsFileMapItem<T>>;

/// A raw walker entry
#[derive(Debug, Clone, PartialEq)]
pub enum FsFileMapItem<T> {
    /// Directory with its entries
    Directory(FsFileMap<T>),
    /// File with its parsed contents
    File(T),
}

impl<T> FsFileMapItem<T> {
    /// Whether this entry is a directory
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Whether this entry is a file
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Parsed data of a file entry
    pub fn as_file(&self) -> Option<&T> {
        match self {
            Self::File(data) => Some(data),
            Self::Directory(_) => None,
        }
    }

    /// Entries of a directory entry
    pub fn as_directory(&self) -> Option<&FsFileMap<T>> {
        match self {
            Self::Directory(children) => Some(children),
            Self::File(_) => None,
        }
    }
}

/// Handle of a node inside a [`FileMap`](crate::file_map::FileMap) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// One logical entry of a resolved file map
#[derive(Debug, Clone, PartialEq)]
pub struct FileMapItem<T> {
    /// Name segments from the top level to this node
    pub path_parts: Vec<String>,
    /// `/`-joined `path_parts`
    pub path: String,
    /// Node data; for a directory, the data of its index file
    pub data: T,
    /// Owning directory, `None` at the top level
    pub parent: Option<NodeId>,
    /// Present if and only if the node is a directory
    pub children: Option<BTreeMap<String, NodeId>>,
}

impl<T> FileMapItem<T> {
    /// Last path segment
    pub fn name(&self) -> &str {
        self.path_parts.last().map(String::as_str).unwrap_or_default()
    }

    /// Whether this node came from a directory
    pub fn is_directory(&self) -> bool {
        self.children.is_some()
    }
}

/// Position-addressable projection of a [`FileMapItem`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedFileMapItem<T> {
    pub path_parts: Vec<String>,
    pub path: String,
    pub data: T,
    /// Position of this record in its array
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children_indices: Option<Vec<usize>>,
}

/// Flattened file map, in pre-order
pub type FlattenedFileMap<T> = Vec<FlattenedFileMapItem<T>>;
