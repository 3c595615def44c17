/*!
 * Listing of a directory on disk for the command-line tool
 *
 * Without an extension every file is read as plain text and counted. With an
 * extension only matching files are read and parsed as documents; document
 * failures are reported next to the listing instead of aborting it.
 */

use log::debug;
use serde::Serialize;

use crate::cancel::CancelSignal;
use crate::config::Config;
use crate::directory::{format_errors, parse_directory, ParseDirectoryOptions};
use crate::error::Result;
use crate::flatten::flatten;
use crate::fs::{DiskFs, FsModule};
use crate::path::{get_extension, strip_extension};
use crate::resolver::{create_file_map, CreateFileMapOptions};
use crate::types::{FlattenedFileMap, FsFileMap, FsFileOptions};
use crate::utils::{should_ignore, should_include};
use crate::walker::{walk_directory, WalkOptions};

/// What the listing shows for one entry
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntrySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub lines: usize,
    pub words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EntrySummary {
    /// Counts for plain text
    pub fn from_text(contents: &str) -> Self {
        Self {
            title: None,
            lines: contents.lines().count(),
            words: contents.split_whitespace().count(),
            error: None,
        }
    }
}

/// Flattened listing and the formatted document errors, if any
#[derive(Debug, Clone)]
pub struct Listing {
    pub records: FlattenedFileMap<EntrySummary>,
    pub errors: Option<String>,
}

/// Walk and resolve the configured directory
pub fn build_listing(config: &Config, cancel_signal: Option<CancelSignal>) -> Result<Listing> {
    build_listing_with(&DiskFs::new(), config, cancel_signal)
}

/// [`build_listing`] over any filesystem backend
pub fn build_listing_with<F>(
    fs: &F,
    config: &Config,
    cancel_signal: Option<CancelSignal>,
) -> Result<Listing>
where
    F: FsModule + ?Sized,
{
    let directory = config.target_dir.to_string_lossy();
    match &config.extension {
        Some(extension) => document_listing(fs, &directory, extension, config, cancel_signal),
        None => text_listing(fs, &directory, config, cancel_signal),
    }
}

fn accepts_directory(config: &Config, entry: &FsFileOptions) -> bool {
    // The walked root is never ignored by name
    entry.relative_path.is_empty() || !should_ignore(&entry.name, &config.ignore_patterns)
}

fn accepts_file(config: &Config, entry: &FsFileOptions) -> bool {
    !should_ignore(&entry.name, &config.ignore_patterns)
        && (is_index_name(&config.index_file, &entry.name)
            || should_include(&entry.name, &config.include_patterns))
}

/// `name` is `index_file` itself or `index_file` plus an extension
fn is_index_name(index_file: &str, name: &str) -> bool {
    name == index_file
        || get_extension(name).is_some_and(|ext| strip_extension(name, ext) == index_file)
}

fn text_listing<F>(
    fs: &F,
    directory: &str,
    config: &Config,
    cancel_signal: Option<CancelSignal>,
) -> Result<Listing>
where
    F: FsModule + ?Sized,
{
    let mut options = WalkOptions::new(|contents: String| Ok(EntrySummary::from_text(&contents)))
        .with_directory_filter(|entry: &FsFileOptions| accepts_directory(config, entry))
        .with_file_filter(|entry: &FsFileOptions| accepts_file(config, entry));
    if let Some(signal) = cancel_signal {
        options = options.with_cancel_signal(signal);
    }

    let raw = walk_directory(fs, directory, &options)?.unwrap_or_default();
    let index_file = |_: &str, children: &FsFileMap<EntrySummary>| {
        find_index_file(&config.index_file, children)
    };
    let map = create_file_map(raw, index_file, &CreateFileMapOptions::default())?;
    debug!("listed {} entries under {}", map.len(), directory);

    Ok(Listing {
        records: flatten(&map),
        errors: None,
    })
}

/// The child named `index_file`, else the only child whose stem is `index_file`
fn find_index_file<T>(index_file: &str, children: &FsFileMap<T>) -> Option<String> {
    if children.get(index_file).is_some_and(|item| item.is_file()) {
        return Some(index_file.to_string());
    }
    let mut candidates = children
        .iter()
        .filter(|(name, item)| item.is_file() && is_index_name(index_file, name));
    match (candidates.next(), candidates.next()) {
        (Some((name, _)), None) => Some(name.clone()),
        _ => None,
    }
}

fn document_listing<F>(
    fs: &F,
    directory: &str,
    extension: &str,
    config: &Config,
    cancel_signal: Option<CancelSignal>,
) -> Result<Listing>
where
    F: FsModule + ?Sized,
{
    let options = ParseDirectoryOptions {
        extension: extension.to_string(),
        index_file_name: config.index_file.clone(),
        get_index_file_name: None,
        directory_filter: Some(Box::new(|entry: &FsFileOptions| {
            accepts_directory(config, entry)
        })),
        file_filter: Some(Box::new(|entry: &FsFileOptions| accepts_file(config, entry))),
        transform_file_name: None,
        cancel_signal,
    };
    let result = parse_directory(fs, directory, &options)?;

    let summaries = result.data.map_data(|parsed| match parsed {
        Ok(document) => EntrySummary {
            title: document.title.clone(),
            lines: document.lines,
            words: document.words,
            error: None,
        },
        Err(error) => EntrySummary {
            error: Some(error.to_string()),
            ..Default::default()
        },
    });
    let errors = (!result.successful).then(|| format_errors(&result.data));

    Ok(Listing {
        records: flatten(&summaries),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileMapError;
    use crate::fs::MemoryFs;
    use crate::report::ReportFormat;
    use std::path::PathBuf;

    fn config(extension: Option<&str>) -> Config {
        Config {
            target_dir: PathBuf::from("site"),
            index_file: "index".to_string(),
            extension: extension.map(str::to_string),
            ignore_patterns: vec!["drafts".to_string()],
            include_patterns: vec![],
            num_threads: 1,
            format: ReportFormat::Table,
        }
    }

    fn site() -> MemoryFs {
        MemoryFs::new()
            .with_file("site/index.md", "# Home\nwelcome home")
            .and_then(|fs| fs.with_file("site/guide/index.md", "# Guide"))
            .and_then(|fs| fs.with_file("site/guide/setup.md", "---\ntitle: Setup\n---\none two"))
            .and_then(|fs| fs.with_file("site/drafts/wip.md", "---\ntitle: wip"))
            .and_then(|fs| fs.with_file("site/.git/HEAD", "ref"))
            .unwrap()
    }

    #[test]
    fn test_text_listing_matches_index_by_stem() {
        let listing = build_listing_with(&site(), &config(None), None).unwrap();
        let paths: Vec<_> = listing.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["guide", "guide/setup.md", "index.md"]);
        assert_eq!(listing.records[0].data.words, 2);
        assert_eq!(listing.records[2].data.lines, 2);
        assert!(listing.errors.is_none());
    }

    #[test]
    fn test_document_listing_uses_titles() {
        let listing = build_listing_with(&site(), &config(Some("md")), None).unwrap();
        let paths: Vec<_> = listing.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["guide", "guide/setup", "index"]);
        assert_eq!(listing.records[0].data.title.as_deref(), Some("Guide"));
        assert_eq!(listing.records[1].data.title.as_deref(), Some("Setup"));
        assert!(listing.errors.is_none());
    }

    #[test]
    fn test_document_errors_are_listed() {
        let mut config = config(Some("md"));
        config.ignore_patterns.clear();
        let fs = site().with_file("site/drafts/index.md", "draft").unwrap();

        let listing = build_listing_with(&fs, &config, None).unwrap();
        let wip = listing
            .records
            .iter()
            .find(|r| r.path == "drafts/wip")
            .unwrap();
        assert!(wip.data.error.is_some());
        let errors = listing.errors.unwrap();
        assert!(errors.starts_with("drafts/wip:\nunterminated front matter"));
    }

    #[test]
    fn test_missing_index_is_fatal() {
        let fs = site().with_file("site/empty/readme.md", "x").unwrap();
        let err = build_listing_with(&fs, &config(Some("md")), None).unwrap_err();
        assert!(matches!(
            err,
            FileMapError::IndexFileNotFound { ref directory, .. } if directory == "empty"
        ));
    }

    #[test]
    fn test_find_index_file() {
        let children: FsFileMap<()> = vec![
            ("index.md".to_string(), crate::types::FsFileMapItem::File(())),
            ("other".to_string(), crate::types::FsFileMapItem::File(())),
        ]
        .into_iter()
        .collect();
        assert_eq!(find_index_file("index", &children).as_deref(), Some("index.md"));
        assert_eq!(find_index_file("other", &children).as_deref(), Some("other"));
        assert_eq!(find_index_file("missing", &children), None);
    }
}
