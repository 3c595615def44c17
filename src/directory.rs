/*!
 * Parsing whole directories of documents into file maps
 */

use log::debug;

use crate::cancel::CancelSignal;
use crate::document::{parse_document, Document, DocumentParseResult};
use crate::error::Result;
use crate::file_map::FileMap;
use crate::flatten::flatten;
use crate::fs::FsModule;
use crate::path::{get_extension, strip_extension};
use crate::resolver::{create_file_map, CreateFileMapOptions};
use crate::types::{FsFileMap, FsFileOptions};
use crate::walker::{walk_directory, EntryFilter, WalkOptions};

/// Picks the index document among a directory's raw children
pub type IndexFileResolver<'a> = dyn Fn(&str, &FsFileMap<DocumentParseResult>) -> Option<String> + 'a;

/// Options for [`parse_directory`]
pub struct ParseDirectoryOptions<'a> {
    /// Only files with this extension are read; it is stripped from names
    pub extension: String,
    /// Name of each directory's index document, without the extension
    pub index_file_name: String,
    /// Called with the directory name and its raw children, before any
    /// renaming. Replaces `index_file_name` when set
    pub get_index_file_name: Option<Box<IndexFileResolver<'a>>>,
    pub directory_filter: Option<Box<EntryFilter<'a>>>,
    /// Applied after the extension check
    pub file_filter: Option<Box<EntryFilter<'a>>>,
    /// Applied after the extension is stripped
    pub transform_file_name: Option<Box<dyn Fn(&str, &DocumentParseResult) -> String + 'a>>,
    pub cancel_signal: Option<CancelSignal>,
}

impl Default for ParseDirectoryOptions<'_> {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
            index_file_name: "index".to_string(),
            get_index_file_name: None,
            directory_filter: None,
            file_filter: None,
            transform_file_name: None,
            cancel_signal: None,
        }
    }
}

/// Documents of a directory and whether all of them parsed
#[derive(Debug, Clone)]
pub struct ParseDirectoryResult {
    pub successful: bool,
    pub data: FileMap<DocumentParseResult>,
}

impl ParseDirectoryResult {
    /// Only the parsed documents, if every document parsed
    pub fn documents(&self) -> Option<FileMap<Document>> {
        self.data.try_map_data(|result| result.clone()).ok()
    }
}

/// Walk `directory`, parse every document and resolve index documents
///
/// Document failures are kept as data and reflected in `successful`; only
/// filesystem errors, cancellation and index resolution errors are returned
/// as `Err`. A missing directory gives an empty, successful result.
pub fn parse_directory<F>(
    fs: &F,
    directory: &str,
    options: &ParseDirectoryOptions<'_>,
) -> Result<ParseDirectoryResult>
where
    F: FsModule + ?Sized,
{
    let extension = options.extension.trim_start_matches('.');
    let file_filter = options.file_filter.as_deref();

    let mut walk_options = WalkOptions::new(|contents: String| Ok(parse_document(&contents)))
        .with_file_filter(move |entry: &FsFileOptions| {
            get_extension(&entry.name) == Some(extension)
                && file_filter.map_or(true, |filter| filter(entry))
        });
    if let Some(filter) = options.directory_filter.as_deref() {
        walk_options =
            walk_options.with_directory_filter(move |entry: &FsFileOptions| filter(entry));
    }
    if let Some(signal) = &options.cancel_signal {
        walk_options = walk_options.with_cancel_signal(signal.clone());
    }

    let raw = walk_directory(fs, directory, &walk_options)?.unwrap_or_default();
    let index_file = format!("{}.{}", options.index_file_name, extension);
    let create_options = CreateFileMapOptions::default().with_transform_file_name(
        |name: &str, result: &DocumentParseResult| {
            let stripped = strip_extension(name, extension);
            match &options.transform_file_name {
                Some(transform) => transform(stripped, result),
                None => stripped.to_string(),
            }
        },
    );
    let get_index_file_name = |name: &str, children: &FsFileMap<DocumentParseResult>| {
        match &options.get_index_file_name {
            Some(resolve) => resolve(name, children),
            None => Some(index_file.clone()),
        }
    };
    let data = create_file_map(raw, get_index_file_name, &create_options)?;

    let successful = !data.any(|result| result.is_err());
    debug!(
        "parsed {} document(s) under {}, successful: {}",
        data.len(),
        directory,
        successful
    );
    Ok(ParseDirectoryResult { successful, data })
}

/// `path:\n<error>` for every failed document in flattened order
pub fn format_errors(map: &FileMap<DocumentParseResult>) -> String {
    flatten(map)
        .iter()
        .filter_map(|record| match &record.data {
            Ok(_) => None,
            Err(error) => Some(format!("{}:\n{}", record.path, error)),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
