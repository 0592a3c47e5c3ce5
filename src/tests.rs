/*!
 * Tests for shelfview core behavior
 */

use tempfile::tempdir;

use crate::search::compute_visible;
use crate::state::{self, ViewMode, ViewState};
use crate::storage::{Favorites, PrefStore};
use crate::types::{Entry, EntryKind};

// Helper to build a top-level directory entry
fn shelf_dir(name: &str) -> Entry {
    Entry::new(name, format!("shelf/{}", name), EntryKind::Dir)
}

// Helper to build an indexed nested file
fn indexed_file(name: &str, path: &str) -> Entry {
    Entry::new(name, path, EntryKind::File)
}

fn names(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

// An empty term must return the top-level listing unchanged
#[test]
fn test_empty_term_is_identity() {
    let top = vec![shelf_dir("Alpha"), shelf_dir("Beta")];

    let visible = compute_visible("", &top, &[]);

    assert_eq!(visible, top);
}

// Matching by name and by contained file must not duplicate the entry
#[test]
fn test_name_and_file_match_appears_once() {
    let top = vec![shelf_dir("Notes"), shelf_dir("Beta")];
    let indexed = vec![indexed_file("notes.txt", "shelf/Notes/notes.txt")];

    let visible = compute_visible("notes", &top, &indexed);

    assert_eq!(names(&visible), vec!["Notes"]);
}

// File matches map back to the owning top-level entry through the second
// path segment
#[test]
fn test_file_match_maps_to_owner() {
    let top = vec![shelf_dir("Alpha"), shelf_dir("Beta")];
    let indexed = vec![indexed_file("notes.txt", "shelf/Alpha/sub/notes.txt")];

    assert_eq!(names(&compute_visible("notes", &top, &indexed)), vec!["Alpha"]);
    assert_eq!(names(&compute_visible("Beta", &top, &indexed)), vec!["Beta"]);
    assert!(compute_visible("zzz", &top, &indexed).is_empty());
}

// A duplicated index entry must not duplicate the reported owner
#[test]
fn test_duplicate_index_entries_report_owner_once() {
    let top = vec![shelf_dir("Alpha"), shelf_dir("Beta")];
    let file = indexed_file("notes.txt", "shelf/Alpha/notes.txt");
    let indexed = vec![file.clone(), file];

    let visible = compute_visible("notes", &top, &indexed);

    assert_eq!(names(&visible), vec!["Alpha"]);
}

// Index entries whose owner is unknown (index running ahead of the root
// fetch) are dropped silently
#[test]
fn test_unknown_owner_is_dropped() {
    let top = vec![shelf_dir("Alpha")];
    let indexed = vec![indexed_file("notes.txt", "shelf/Gone/notes.txt")];

    assert!(compute_visible("notes", &top, &indexed).is_empty());
}

// Substring matching ignores case on both sides
#[test]
fn test_match_is_case_insensitive() {
    let top = vec![shelf_dir("Alpha")];
    let indexed = vec![indexed_file("README.md", "shelf/Alpha/README.md")];

    assert_eq!(names(&compute_visible("ALPHA", &top, &indexed)), vec!["Alpha"]);
    assert_eq!(names(&compute_visible("readme", &top, &indexed)), vec!["Alpha"]);
}

// Results come out in top-level order no matter the index order
#[test]
fn test_result_preserves_top_level_order() {
    let top = vec![shelf_dir("Alpha"), shelf_dir("Beta"), shelf_dir("Gamma")];
    let indexed = vec![
        indexed_file("zz.txt", "shelf/Gamma/zz.txt"),
        indexed_file("zz.txt", "shelf/Alpha/zz.txt"),
    ];

    let visible = compute_visible("zz", &top, &indexed);

    assert_eq!(names(&visible), vec!["Alpha", "Gamma"]);
}

// Unfavoriting a visible entry while the favorites view is active removes
// it from the next recomputed visible set
#[test]
fn test_unfavorite_removes_entry_from_favorites_view() {
    let top = vec![shelf_dir("Alpha"), shelf_dir("Beta")];
    let mut favorites = Favorites::default();
    favorites.toggle("Alpha");
    favorites.toggle("Beta");

    let mut view = ViewState::default();
    view.set_mode(ViewMode::Favorites);

    let visible = state::recompute(&view, &top, &[], &favorites);
    assert_eq!(names(&visible), vec!["Alpha", "Beta"]);

    favorites.toggle("Alpha");
    let visible = state::recompute(&view, &top, &[], &favorites);
    assert_eq!(names(&visible), vec!["Beta"]);
}

// The favorites intersection applies on top of the search result
#[test]
fn test_favorites_view_intersects_search() {
    let top = vec![shelf_dir("Alpha"), shelf_dir("Beta")];
    let indexed = vec![
        indexed_file("notes.txt", "shelf/Alpha/notes.txt"),
        indexed_file("notes.txt", "shelf/Beta/notes.txt"),
    ];
    let mut favorites = Favorites::default();
    favorites.toggle("Beta");

    let mut view = ViewState::default();
    view.set_mode(ViewMode::Favorites);
    view.set_search_term("notes");

    let visible = state::recompute(&view, &top, &indexed, &favorites);

    assert_eq!(names(&visible), vec!["Beta"]);
}

// Favorites persisted by an earlier session shape the favorites view of a
// fresh one
#[test]
fn test_persisted_favorites_restore_view() {
    let dir = tempdir().unwrap();

    {
        let store = PrefStore::open(dir.path());
        let mut favorites = store.load_favorites();
        favorites.toggle("Alpha");
        store.save_favorites(&favorites).unwrap();
    }

    // Fresh load, as on startup
    let store = PrefStore::open(dir.path());
    let favorites = store.load_favorites();

    let top = vec![shelf_dir("Alpha"), shelf_dir("Beta")];
    let mut view = ViewState::default();
    view.set_mode(ViewMode::Favorites);

    let visible = state::recompute(&view, &top, &[], &favorites);
    assert_eq!(names(&visible), vec!["Alpha"]);
}
