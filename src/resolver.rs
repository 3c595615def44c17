/*!
 * Index resolution: raw file-system maps into file maps
 */

use log::trace;

use crate::error::{FileMapError, Result};
use crate::file_map::FileMap;
use crate::path::join_path_parts;
use crate::types::{FileMapItem, FsFileMap, FsFileMapItem, NodeId};

/// Renames a file given its original name and parsed data
pub type TransformFileName<'a, T> = dyn Fn(&str, &T) -> String + 'a;

/// Renames a directory given its original name
pub type TransformDirectoryName<'a> = dyn Fn(&str) -> String + 'a;

/// Optional renaming applied while resolving
pub struct CreateFileMapOptions<'a, T> {
    pub transform_file_name: Option<Box<TransformFileName<'a, T>>>,
    pub transform_directory_name: Option<Box<TransformDirectoryName<'a>>>,
}

impl<T> Default for CreateFileMapOptions<'_, T> {
    fn default() -> Self {
        Self {
            transform_file_name: None,
            transform_directory_name: None,
        }
    }
}

impl<'a, T> CreateFileMapOptions<'a, T> {
    /// Set the file name transform
    pub fn with_transform_file_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &T) -> String + 'a,
    {
        self.transform_file_name = Some(Box::new(f));
        self
    }

    /// Set the directory name transform
    pub fn with_transform_directory_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + 'a,
    {
        self.transform_directory_name = Some(Box::new(f));
        self
    }

    fn file_name(&self, name: &str, data: &T) -> String {
        match &self.transform_file_name {
            Some(transform) => transform(name, data),
            None => name.to_string(),
        }
    }

    fn directory_name(&self, name: &str) -> String {
        match &self.transform_directory_name {
            Some(transform) => transform(name),
            None => name.to_string(),
        }
    }
}

/// Resolve a raw map into a [`FileMap`]
///
/// Every directory below the top level takes the data of the file named by
/// `get_index_file_name(directory_name, raw_children)`; that file is not one of
/// its children. Names are transformed once, here.
///
/// Fails if a directory has no index file, the named entry is missing or is a
/// directory, a transformed name is empty, or two entries of one directory end
/// up with the same name.
pub fn create_file_map<T, G>(
    fs_file_map: FsFileMap<T>,
    get_index_file_name: G,
    options: &CreateFileMapOptions<'_, T>,
) -> Result<FileMap<T>>
where
    G: Fn(&str, &FsFileMap<T>) -> Option<String>,
{
    let mut map = FileMap::new();
    resolve_entries(&mut map, fs_file_map, None, &get_index_file_name, options)?;
    Ok(map)
}

fn resolve_entries<T, G>(
    map: &mut FileMap<T>,
    entries: FsFileMap<T>,
    parent: Option<NodeId>,
    get_index_file_name: &G,
    options: &CreateFileMapOptions<'_, T>,
) -> Result<()>
where
    G: Fn(&str, &FsFileMap<T>) -> Option<String>,
{
    for (name, entry) in entries {
        match entry {
            FsFileMapItem::File(data) => {
                let transformed = options.file_name(&name, &data);
                let final_name = checked_name(map, parent, &name, transformed)?;
                let item = new_item(map, parent, &final_name, data, false);
                map.insert(parent, final_name, item)?;
            }
            FsFileMapItem::Directory(mut children) => {
                let transformed = options.directory_name(&name);
                let final_name = checked_name(map, parent, &name, transformed)?;
                let path = join_path_parts(&map.child_path_parts(parent, &final_name));

                let index_name = get_index_file_name(&name, &children)
                    .ok_or_else(|| FileMapError::MissingIndexFile(path.clone()))?;
                let data = match children.remove(&index_name) {
                    Some(FsFileMapItem::File(data)) => data,
                    Some(FsFileMapItem::Directory(_)) => {
                        return Err(FileMapError::IndexFileIsDirectory {
                            directory: path,
                            file: index_name,
                        })
                    }
                    None => {
                        return Err(FileMapError::IndexFileNotFound {
                            directory: path,
                            file: index_name,
                        })
                    }
                };
                trace!("{} takes its data from '{}'", path, index_name);

                let item = new_item(map, parent, &final_name, data, true);
                let id = map.insert(parent, final_name, item)?;
                resolve_entries(map, children, Some(id), get_index_file_name, options)?;
            }
        }
    }
    Ok(())
}

fn checked_name<T>(
    map: &FileMap<T>,
    parent: Option<NodeId>,
    original: &str,
    transformed: String,
) -> Result<String> {
    let name = transformed.trim();
    if name.is_empty() {
        return Err(FileMapError::InvalidName(join_path_parts(
            &map.child_path_parts(parent, original),
        )));
    }
    Ok(name.to_string())
}

fn new_item<T>(
    map: &FileMap<T>,
    parent: Option<NodeId>,
    name: &str,
    data: T,
    is_directory: bool,
) -> FileMapItem<T> {
    let path_parts = map.child_path_parts(parent, name);
    FileMapItem {
        path: join_path_parts(&path_parts),
        path_parts,
        data,
        parent,
        children: is_directory.then(Default::default),
    }
}
