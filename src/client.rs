/*!
 * HTTP fetch client for shelf listings and file content
 */

use std::sync::Arc;

use reqwest::blocking::Client;

use crate::config::Config;
use crate::error::FetchError;
use crate::index::SearchIndex;
use crate::types::Entry;

/// Client for the static shelf host
///
/// All requests are plain GETs against URLs derived from shelf paths; the
/// host is never written to. The client is shared across the UI loop and
/// the background crawl workers.
pub struct FetchClient {
    config: Config,
    client: Client,
    index: Arc<SearchIndex>,
}

impl FetchClient {
    /// Create a new fetch client feeding the given search index
    pub fn new(config: Config, index: Arc<SearchIndex>) -> Self {
        Self {
            config,
            client: Client::new(),
            index,
        }
    }

    /// Fetch the immediate children of a shelf directory.
    ///
    /// Every successfully fetched batch is merged into the search index
    /// before it is returned, whether the caller wanted it for display or
    /// for background indexing. The merge tolerates duplicates from repeated
    /// fetches of the same path.
    pub fn fetch_children(&self, path: &str) -> Result<Vec<Entry>, FetchError> {
        let url = self.config.listing_url(path);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }

        let body = response.text().map_err(|source| FetchError::Transport {
            path: path.to_string(),
            source,
        })?;

        let entries: Vec<Entry> =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                path: path.to_string(),
                source,
            })?;

        self.index.append(&entries);

        Ok(entries)
    }

    /// Fetch the raw content of a file entry, for the copy-contents action
    pub fn fetch_file(&self, path: &str) -> Result<String, FetchError> {
        let url = self.config.file_url(path);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }

        response.text().map_err(|source| FetchError::Transport {
            path: path.to_string(),
            source,
        })
    }

    /// URL a file's content is served from
    pub fn file_url(&self, path: &str) -> String {
        self.config.file_url(path)
    }
}
