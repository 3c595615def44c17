/*!
 * Configuration handling for the filemap command-line tool
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::ensure;
use crate::error::Result;
use crate::report::ReportFormat;

/// Command-line arguments for filemap
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "filemap",
    version = env!("CARGO_PKG_VERSION"),
    about = "List a directory tree as an index-aware file map",
    long_about = "Walks a directory, gives every directory the data of its index file and prints the flattened, index-addressed listing as a table or JSON."
)]
pub struct Args {
    /// Directory to walk
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Name of the file that holds each directory's data
    #[clap(long, default_value = "index")]
    pub index_file: String,

    /// Only include files with this extension and parse them as documents
    #[clap(long)]
    pub extension: Option<String>,

    /// Comma-separated list of patterns to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore_patterns: Vec<String>,

    /// Comma-separated list of patterns to include (if specified, only matching files are included)
    #[clap(long, value_delimiter = ',')]
    pub include_patterns: Vec<String>,

    /// Number of threads to use for walking
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Output format of the listing
    #[clap(long, value_enum, default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to walk
    pub target_dir: PathBuf,

    /// Index file name; in document mode it is given without the extension
    pub index_file: String,

    /// Document extension, without the leading dot
    pub extension: Option<String>,

    /// Patterns to ignore
    pub ignore_patterns: Vec<String>,

    /// Patterns to include (if empty, include all)
    pub include_patterns: Vec<String>,

    /// Number of threads to use for walking
    pub num_threads: usize,

    /// Output format
    pub format: ReportFormat,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.directory_path),
            index_file: args.index_file.trim().to_string(),
            extension: args
                .extension
                .map(|ext| ext.trim().trim_start_matches('.').to_string()),
            ignore_patterns: args.ignore_patterns,
            include_patterns: args.include_patterns,
            num_threads: args.threads,
            format: args.format,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.target_dir.is_dir(),
            Config,
            "Target directory not found: {}",
            self.target_dir.display()
        );
        ensure!(!self.index_file.is_empty(), Config, "Index file name is empty");
        ensure!(
            !self.index_file.contains('/'),
            Config,
            "Index file name must not contain '/': {}",
            self.index_file
        );
        if let Some(extension) = &self.extension {
            ensure!(!extension.is_empty(), Config, "Extension is empty");
        }
        ensure!(self.num_threads > 0, Config, "Thread count must be positive");
        Ok(())
    }
}
