/*!
 * Core types for shelf listings
 */

use serde::{Deserialize, Serialize};
use strum::Display;

/// Kind of a shelf entry, as declared by the descriptor JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Directory with its own `index.json` descriptor
    Dir,
    /// Regular file served by the content host
    File,
    /// External link; `path` holds an absolute URL
    Link,
}

/// One entry of a shelf listing
///
/// The same shape serves the root listing and every nested listing. Entries
/// are immutable once fetched; the shelf is a read-only mirror of static
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry name, as displayed and searched
    pub name: String,
    /// Path relative to the shelf base URL (absolute URL for links)
    pub path: String,
    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Entry {
    /// Create an entry. Mostly useful for tests and fixtures.
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    /// Name of the top-level entry that owns this path.
    ///
    /// Paths look like `<shelf root>/<top-level name>/...`, so the owner is
    /// the second path segment. Returns `None` for paths too shallow to
    /// carry one.
    pub fn shelf_owner(&self) -> Option<&str> {
        let mut segments = self.path.split('/');
        segments.next()?;
        segments.next().filter(|s| !s.is_empty())
    }

    /// Whether this entry has its own listing descriptor
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_owner_second_segment() {
        let entry = Entry::new("notes.txt", "shelf/Alpha/sub/notes.txt", EntryKind::File);
        assert_eq!(entry.shelf_owner(), Some("Alpha"));

        let top = Entry::new("Alpha", "shelf/Alpha", EntryKind::Dir);
        assert_eq!(top.shelf_owner(), Some("Alpha"));

        let shallow = Entry::new("shelf", "shelf", EntryKind::Dir);
        assert_eq!(shallow.shelf_owner(), None);
    }

    #[test]
    fn test_entry_wire_format() {
        let json = r#"{"name":"Alpha","path":"shelf/Alpha","type":"dir"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "Alpha");
        assert_eq!(entry.kind, EntryKind::Dir);
        assert_eq!(serde_json::to_string(&entry).unwrap(), json);
    }
}
