/*!
 * Background shelf crawl for search indexing
 *
 * Walks every directory of the shelf ahead of user expansion so the search
 * index eventually covers the whole tree. The walk is fire-and-forget on a
 * bounded worker pool; one failed branch never blocks another, and failures
 * only cost search completeness, so they are logged rather than surfaced.
 */

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;
use rayon::ThreadPool;
use tracing::{debug, warn};

use crate::client::FetchClient;
use crate::types::Entry;

/// Progress event emitted after each crawled directory
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// A directory listing was fetched and merged into the index
    Indexed {
        /// Path of the crawled directory
        path: String,
        /// Number of entries the listing contributed
        entries: usize,
    },
    /// A directory listing could not be fetched; logged only
    Failed {
        /// Path of the directory that failed
        path: String,
    },
}

/// Recursive background crawler feeding the search index
///
/// Cloning yields another handle to the same crawl: the visited set is
/// shared, so a path queued through any handle is fetched at most once per
/// session even when display fetches and the background walk race.
#[derive(Clone)]
pub struct Crawler {
    client: Arc<FetchClient>,
    pool: Arc<ThreadPool>,
    visited: Arc<Mutex<HashSet<String>>>,
    events: Sender<CrawlEvent>,
}

impl Crawler {
    /// Create a crawler running on the given worker pool
    pub fn new(client: Arc<FetchClient>, pool: Arc<ThreadPool>, events: Sender<CrawlEvent>) -> Self {
        Self {
            client,
            pool,
            visited: Arc::new(Mutex::new(HashSet::new())),
            events,
        }
    }

    /// Queue a background crawl of every directory in a listing
    pub fn crawl_listing(&self, entries: &[Entry]) {
        for entry in entries.iter().filter(|e| e.is_dir()) {
            self.crawl_dir(entry.path.clone());
        }
    }

    /// Queue one directory, coalescing repeat requests
    pub fn crawl_dir(&self, path: String) {
        {
            let mut visited = self.visited.lock().unwrap();
            if !visited.insert(path.clone()) {
                return;
            }
        }

        let crawler = self.clone();
        self.pool.spawn(move || crawler.fetch_one(&path));
    }

    fn fetch_one(&self, path: &str) {
        match self.client.fetch_children(path) {
            Ok(entries) => {
                debug!(path, count = entries.len(), "indexed listing");
                let _ = self.events.send(CrawlEvent::Indexed {
                    path: path.to_string(),
                    entries: entries.len(),
                });
                // The fetch already merged the batch into the index; keep
                // walking into any subdirectories it revealed.
                self.crawl_listing(&entries);
            }
            Err(err) => {
                warn!(path, error = %err, "background indexing fetch failed");
                let _ = self.events.send(CrawlEvent::Failed {
                    path: path.to_string(),
                });
            }
        }
    }
}
