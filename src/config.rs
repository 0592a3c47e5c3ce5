/*!
 * Configuration handling for shelfview
 */

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;
use url::Url;

use crate::error::{Result, ShelfError};
use crate::storage::Theme;

/// Command-line arguments for shelfview
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "shelfview",
    version = env!("CARGO_PKG_VERSION"),
    about = "Terminal browser for static shelf trees published as JSON indexes",
    long_about = "Browses a statically hosted tree of JSON index.json listings: \
                  lazy expansion, full-tree search over a background-built index, \
                  favorites and keyboard navigation."
)]
pub struct Args {
    /// Base URL the shelf is published under
    pub base_url: String,

    /// Name of the shelf root directory below the base URL
    #[clap(long, default_value = "shelf")]
    pub root: String,

    /// Number of worker threads for background fetches
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Override the persisted theme for this session
    #[clap(long, value_enum)]
    pub theme: Option<Theme>,

    /// Directory for persisted favorites and theme (defaults to the user data dir)
    #[clap(long)]
    pub data_dir: Option<PathBuf>,

    /// Append log output to this file
    #[clap(long)]
    pub log_file: Option<PathBuf>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL the shelf is published under, without a trailing slash
    pub base_url: String,

    /// Name of the shelf root directory below the base URL
    pub root: String,

    /// Number of worker threads for background fetches
    pub num_threads: usize,

    /// Theme override for this session
    pub theme_override: Option<Theme>,

    /// Directory for persisted preferences
    pub data_dir: Option<PathBuf>,

    /// Log file path
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            base_url: args.base_url.trim_end_matches('/').to_string(),
            root: args.root,
            num_threads: args.threads,
            theme_override: args.theme,
            data_dir: args.data_dir,
            log_file: args.log_file,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ShelfError::Config(format!("invalid base URL '{}': {}", self.base_url, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ShelfError::Config(format!(
                    "unsupported URL scheme '{}' (expected http or https)",
                    other
                )));
            }
        }

        if self.root.is_empty() || self.root.contains('/') {
            return Err(ShelfError::Config(format!(
                "shelf root must be a single path segment, got '{}'",
                self.root
            )));
        }

        if self.num_threads == 0 {
            return Err(ShelfError::Config(
                "at least one worker thread is required".to_string(),
            ));
        }

        Ok(())
    }

    /// URL of the listing descriptor for a shelf path
    ///
    /// Descriptors live at the fixed convention `<path>/index.json`.
    pub fn listing_url(&self, path: &str) -> String {
        format!("{}/{}/index.json", self.base_url, path)
    }

    /// URL a file's content is served from
    pub fn file_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}
