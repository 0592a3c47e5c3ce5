/*!
 * ShelfView - Terminal browser for static shelf trees
 *
 * This library browses trees of static JSON `index.json` listings published
 * on a plain HTTP host: lazy expansion for rendering, an eagerly crawled
 * flat index for full-tree search, favorites, and keyboard navigation.
 */

pub mod app;
pub mod clipboard;
pub mod client;
pub mod config;
pub mod crawler;
pub mod error;
pub mod index;
pub mod search;
pub mod state;
pub mod storage;
pub mod types;
pub mod ui;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use app::App;
pub use client::FetchClient;
pub use config::{Args, Config};
pub use crawler::{CrawlEvent, Crawler};
pub use error::{FetchError, Result, ShelfError, StorageError};
pub use index::SearchIndex;
pub use search::compute_visible;
pub use state::{ViewMode, ViewState};
pub use storage::{Favorites, PrefStore, Theme};
pub use types::{Entry, EntryKind};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
