/*!
 * Directory walking into raw file-system maps
 */

use log::{debug, trace};
use rayon::prelude::*;

use crate::cancel::CancelSignal;
use crate::error::{FileMapError, Result};
use crate::fs::FsModule;
use crate::types::{FsFileMap, FsFileMapItem, FsFileOptions};

/// Predicate over a directory or file about to be walked
pub type EntryFilter<'a> = dyn Fn(&FsFileOptions) -> bool + Send + Sync + 'a;

/// Converts raw file contents into typed data
pub type ParseFileContents<'a, T> = dyn Fn(String) -> Result<T> + Send + Sync + 'a;

/// Options for [`walk_directory`]
pub struct WalkOptions<'a, T> {
    /// Directories rejected here are skipped with everything below them
    pub directory_filter: Option<Box<EntryFilter<'a>>>,
    /// Files rejected here are never read
    pub file_filter: Option<Box<EntryFilter<'a>>>,
    /// Parses every included file; an error aborts the walk
    pub parse_file_contents: Box<ParseFileContents<'a, T>>,
    /// Checked before every directory listing and file read
    pub cancel_signal: Option<CancelSignal>,
}

impl<'a, T> WalkOptions<'a, T> {
    /// Options with only a content parser
    pub fn new<P>(parse_file_contents: P) -> Self
    where
        P: Fn(String) -> Result<T> + Send + Sync + 'a,
    {
        Self {
            directory_filter: None,
            file_filter: None,
            parse_file_contents: Box::new(parse_file_contents),
            cancel_signal: None,
        }
    }

    /// Set the directory filter
    pub fn with_directory_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&FsFileOptions) -> bool + Send + Sync + 'a,
    {
        self.directory_filter = Some(Box::new(filter));
        self
    }

    /// Set the file filter
    pub fn with_file_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&FsFileOptions) -> bool + Send + Sync + 'a,
    {
        self.file_filter = Some(Box::new(filter));
        self
    }

    /// Stop the walk when `signal` is cancelled
    pub fn with_cancel_signal(mut self, signal: CancelSignal) -> Self {
        self.cancel_signal = Some(signal);
        self
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel_signal {
            Some(signal) if signal.is_cancelled() => Err(FileMapError::Cancelled),
            _ => Ok(()),
        }
    }

    fn accepts_directory(&self, options: &FsFileOptions) -> bool {
        self.directory_filter
            .as_ref()
            .map_or(true, |filter| filter(options))
    }

    fn accepts_file(&self, options: &FsFileOptions) -> bool {
        self.file_filter.as_ref().map_or(true, |filter| filter(options))
    }
}

/// Walk `directory` and return the raw map of its entries
///
/// Returns `Ok(None)` if `directory` does not resolve to a directory. The
/// returned map holds the root's entries; the root itself has no item. If the
/// directory filter rejects the root, the map is empty.
///
/// Sibling entries are processed in parallel on the rayon pool. Any error from
/// the filesystem or from `parse_file_contents` aborts the walk.
pub fn walk_directory<F, T>(
    fs: &F,
    directory: &str,
    options: &WalkOptions<'_, T>,
) -> Result<Option<FsFileMap<T>>>
where
    F: FsModule + ?Sized,
    T: Send,
{
    let abs_path = fs.resolve_path(directory.trim())?;
    if !fs.is_directory(&abs_path)? {
        debug!("not a directory, nothing to walk: {}", abs_path);
        return Ok(None);
    }

    debug!("walking {}", abs_path);
    let root = FsFileOptions {
        name: fs.get_basename(&abs_path),
        absolute_path: abs_path,
        relative_path: String::new(),
    };
    if !options.accepts_directory(&root) {
        debug!("root directory rejected by filter: {}", root.absolute_path);
        return Ok(Some(FsFileMap::new()));
    }

    walk_entries(fs, &root, options).map(Some)
}

/// Read the entries of an accepted directory
fn walk_entries<F, T>(
    fs: &F,
    dir: &FsFileOptions,
    options: &WalkOptions<'_, T>,
) -> Result<FsFileMap<T>>
where
    F: FsModule + ?Sized,
    T: Send,
{
    options.check_cancelled()?;
    let names = fs.read_directory(&dir.absolute_path)?;
    trace!("{} entries in {}", names.len(), dir.absolute_path);

    let entries: Vec<Option<(String, FsFileMapItem<T>)>> = names
        .into_par_iter()
        .map(|name| walk_entry(fs, dir, name, options))
        .collect::<Result<_>>()?;

    Ok(entries.into_iter().flatten().collect())
}

/// Produce the item for one entry, or `None` if a filter rejects it
fn walk_entry<F, T>(
    fs: &F,
    dir: &FsFileOptions,
    name: String,
    options: &WalkOptions<'_, T>,
) -> Result<Option<(String, FsFileMapItem<T>)>>
where
    F: FsModule + ?Sized,
    T: Send,
{
    options.check_cancelled()?;
    let entry = FsFileOptions {
        absolute_path: fs.join_path(&dir.absolute_path, &name),
        relative_path: fs.join_path(&dir.relative_path, &name),
        name,
    };

    if fs.is_directory(&entry.absolute_path)? {
        if !options.accepts_directory(&entry) {
            trace!("skipping directory {}", entry.relative_path);
            return Ok(None);
        }
        let children = walk_entries(fs, &entry, options)?;
        return Ok(Some((entry.name, FsFileMapItem::Directory(children))));
    }

    if !options.accepts_file(&entry) {
        trace!("skipping file {}", entry.relative_path);
        return Ok(None);
    }

    let contents = fs.read_file(&entry.absolute_path)?;
    let data = (options.parse_file_contents)(contents)?;
    Ok(Some((entry.name, FsFileMapItem::File(data))))
}
