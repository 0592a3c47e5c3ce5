/*!
 * Controller-owned view state
 *
 * The mutable presentation state: active view mode, live search term, row
 * focus, and the expansion record of every rendered directory node. All
 * mutation happens on the UI loop; every mutation is followed by a full
 * recomputation of the visible set, there is no incremental diffing.
 */

use std::collections::HashMap;

use strum::Display;

use crate::search;
use crate::storage::Favorites;
use crate::types::Entry;

/// Which of the two listing views is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ViewMode {
    /// Full top-level listing
    #[default]
    All,
    /// Favorited entries only
    Favorites,
}

/// Fetched-children outcome for one expanded directory node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirListing {
    /// Fetch dispatched, response not applied yet
    Loading,
    /// Children fetched and retained for this rendered node
    Loaded(Vec<Entry>),
    /// Fetch failed; rendered as an inline error row
    Failed(String),
}

/// Expansion record for one directory path
#[derive(Debug, Clone)]
pub struct DirExpansion {
    /// Whether the node is currently open
    pub expanded: bool,
    /// Children outcome, retained across collapse/expand of this node
    pub listing: DirListing,
}

/// Outcome of toggling a directory node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Node opened for the first time; a fetch must be dispatched
    FetchNeeded,
    /// Node opened from retained state
    Expanded,
    /// Node closed
    Collapsed,
}

/// One row of the rendered listing, produced by [`flatten_rows`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibleRow {
    /// A shelf entry at some depth; depth 0 rows are top-level cards
    Entry {
        /// The entry this row shows
        entry: Entry,
        /// Nesting depth below the top-level listing
        depth: usize,
    },
    /// Loading placeholder under a directory whose fetch is in flight
    Loading {
        /// Nesting depth of the placeholder
        depth: usize,
    },
    /// Inline error row under a directory whose fetch failed
    Error {
        /// Display message of the failure
        message: String,
        /// Nesting depth of the error row
        depth: usize,
    },
    /// Row under a loaded directory that turned out to be empty
    Empty {
        /// Nesting depth of the row
        depth: usize,
    },
}

impl VisibleRow {
    /// Whether keyboard focus can land on this row
    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Entry { .. })
    }
}

/// Mutable presentation state owned by the app controller
#[derive(Debug, Default)]
pub struct ViewState {
    /// Active view mode
    pub mode: ViewMode,
    /// Live search term
    pub search_term: String,
    /// Focused row in the flattened visible rows
    pub focused: Option<usize>,
    /// Expansion state per directory path.
    ///
    /// Reset whenever the visible set regenerates, so directories revert to
    /// collapsed after a search edit, matching the rendered-node lifetime of
    /// their listings.
    expansion: HashMap<String, DirExpansion>,
}

impl ViewState {
    /// Switch the view mode; returns whether it changed
    pub fn set_mode(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.regenerate();
        true
    }

    /// Replace the search term, collapsing every directory
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.regenerate();
    }

    /// Expansion record for a directory path, if any
    pub fn expansion(&self, path: &str) -> Option<&DirExpansion> {
        self.expansion.get(path)
    }

    /// Whether a directory node is currently open
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expansion.get(path).is_some_and(|e| e.expanded)
    }

    /// Toggle a directory node open or closed.
    ///
    /// The first open of a node needs a fetch; afterwards the retained
    /// listing (loaded or failed) is reused until the visible set
    /// regenerates.
    pub fn toggle_expansion(&mut self, path: &str) -> ToggleOutcome {
        if let Some(record) = self.expansion.get_mut(path) {
            record.expanded = !record.expanded;
            if record.expanded {
                ToggleOutcome::Expanded
            } else {
                ToggleOutcome::Collapsed
            }
        } else {
            self.expansion.insert(
                path.to_string(),
                DirExpansion {
                    expanded: true,
                    listing: DirListing::Loading,
                },
            );
            ToggleOutcome::FetchNeeded
        }
    }

    /// Apply the outcome of a dispatched children fetch.
    ///
    /// Results for nodes that were dropped by a regeneration in the
    /// meantime are discarded; the fetch itself was still indexed.
    pub fn apply_listing(&mut self, path: &str, listing: DirListing) {
        if let Some(record) = self.expansion.get_mut(path) {
            record.listing = listing;
        }
    }

    /// Drop all expansion state, collapsing every directory
    pub fn regenerate(&mut self) {
        self.expansion.clear();
        self.focused = None;
    }
}

/// Recompute the visible top-level set from the current state.
///
/// Starts from the search result over the top-level listing and the index
/// snapshot, then intersects with the favorites set when the favorites view
/// is active. Cheap relative to network latency; invoked eagerly after every
/// state mutation.
pub fn recompute(
    state: &ViewState,
    top_level: &[Entry],
    indexed: &[Entry],
    favorites: &Favorites,
) -> Vec<Entry> {
    let mut visible = search::compute_visible(&state.search_term, top_level, indexed);
    if state.mode == ViewMode::Favorites {
        visible.retain(|entry| favorites.contains(&entry.name));
    }
    visible
}

/// Flatten the visible top-level entries and their expanded listings into
/// the rows the renderer shows and the keyboard navigates.
pub fn flatten_rows(visible: &[Entry], state: &ViewState) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    for entry in visible {
        push_entry(&mut rows, entry, 0, state);
    }
    rows
}

fn push_entry(rows: &mut Vec<VisibleRow>, entry: &Entry, depth: usize, state: &ViewState) {
    rows.push(VisibleRow::Entry {
        entry: entry.clone(),
        depth,
    });

    if !entry.is_dir() || !state.is_expanded(&entry.path) {
        return;
    }

    match state.expansion(&entry.path).map(|e| &e.listing) {
        None | Some(DirListing::Loading) => rows.push(VisibleRow::Loading { depth: depth + 1 }),
        Some(DirListing::Failed(message)) => rows.push(VisibleRow::Error {
            message: message.clone(),
            depth: depth + 1,
        }),
        Some(DirListing::Loaded(children)) if children.is_empty() => {
            rows.push(VisibleRow::Empty { depth: depth + 1 });
        }
        Some(DirListing::Loaded(children)) => {
            for child in children {
                push_entry(rows, child, depth + 1, state);
            }
        }
    }
}
