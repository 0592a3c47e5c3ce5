/*!
 * Search filtering over the shelf
 *
 * Matches a search term against the top-level listing and the accumulated
 * search index, and maps nested matches back to the top-level entry that
 * owns them.
 */

use crate::types::Entry;

/// Compute the visible top-level entries for a search term.
///
/// An empty term is the identity: the top-level listing is returned
/// unchanged. Otherwise an entry is visible when its own name contains the
/// term (case-insensitive), or when any indexed entry it owns does. An entry
/// matching both ways appears exactly once, and the result preserves
/// top-level order.
///
/// Indexed entries whose owner is not present in `top_level` (the index can
/// briefly run ahead of the root fetch) are silently dropped.
pub fn compute_visible(term: &str, top_level: &[Entry], indexed: &[Entry]) -> Vec<Entry> {
    if term.is_empty() {
        return top_level.to_vec();
    }

    let needle = term.to_lowercase();
    let mut matched = vec![false; top_level.len()];

    // Direct matches against top-level names
    for (i, entry) in top_level.iter().enumerate() {
        if entry.name.to_lowercase().contains(&needle) {
            matched[i] = true;
        }
    }

    // Matches against indexed entries, mapped back to their owning
    // top-level entry by the second path segment
    for entry in indexed {
        if !entry.name.to_lowercase().contains(&needle) {
            continue;
        }
        let Some(owner) = entry.shelf_owner() else {
            continue;
        };
        if let Some(i) = top_level.iter().position(|e| e.name == owner) {
            matched[i] = true;
        }
    }

    top_level
        .iter()
        .zip(&matched)
        .filter(|(_, hit)| **hit)
        .map(|(entry, _)| entry.clone())
        .collect()
}
