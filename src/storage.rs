/*!
 * Persisted preferences: favorites and theme
 *
 * Two keys in a small file-backed store, mirroring the key-value storage of
 * the published shelf's web frontends: a JSON array of favorited names and a
 * JSON string naming the theme. A missing key is a valid initial state.
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::StorageError;

const FAVORITES_KEY: &str = "favorites.json";
const THEME_KEY: &str = "theme.json";

/// Color theme for the UI
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    /// Dark theme (the default when nothing is persisted)
    #[default]
    Dark,
    /// Light theme
    Light,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Set of favorited top-level entry names
///
/// Membership is by exact name equality; top-level names are assumed unique
/// (not enforced). Insertion order is preserved, matching the stored array.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    names: Vec<String>,
}

impl Favorites {
    /// Build from a list of names
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Whether a name is favorited
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Toggle a name; returns `true` when the name is now a favorite
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
            false
        } else {
            self.names.push(name.to_string());
            true
        }
    }

    /// Number of favorited names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is favorited
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// File-backed key-value store for preferences
///
/// Each key is one JSON file under the store directory. Reads fall back to
/// defaults when a key is missing or unreadable; writes create the directory
/// on demand and replace the whole key.
#[derive(Debug, Clone)]
pub struct PrefStore {
    dir: PathBuf,
}

impl PrefStore {
    /// Open the store under an explicit directory
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the store under the per-user data directory
    pub fn open_default() -> Result<Self, StorageError> {
        let dir = dirs::data_dir()
            .ok_or(StorageError::NoDataDir)?
            .join("shelfview");
        Ok(Self { dir })
    }

    /// Directory the store writes under
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the favorites set, defaulting to empty
    pub fn load_favorites(&self) -> Favorites {
        self.read_key(FAVORITES_KEY).unwrap_or_default()
    }

    /// Persist the favorites set
    pub fn save_favorites(&self, favorites: &Favorites) -> Result<(), StorageError> {
        self.write_key(FAVORITES_KEY, favorites)
    }

    /// Load the theme, defaulting to dark
    pub fn load_theme(&self) -> Theme {
        self.read_key(THEME_KEY).unwrap_or_default()
    }

    /// Persist the theme
    pub fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.write_key(THEME_KEY, &theme)
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let content = fs::read_to_string(self.dir.join(key)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string(value)?;
        fs::write(self.dir.join(key), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_keys_are_valid_defaults() {
        let dir = tempdir().unwrap();
        let store = PrefStore::open(dir.path().join("nothing-here"));

        assert!(store.load_favorites().is_empty());
        assert_eq!(store.load_theme(), Theme::Dark);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let store = PrefStore::open(dir.path());

        let mut favorites = store.load_favorites();
        assert!(favorites.toggle("Alpha"));
        store.save_favorites(&favorites).unwrap();
        store.save_theme(Theme::Light).unwrap();

        let reloaded = store.load_favorites();
        assert!(reloaded.contains("Alpha"));
        assert_eq!(reloaded.len(), 1);
        assert_eq!(store.load_theme(), Theme::Light);

        // Stored formats are a bare array of names and a bare string
        let raw = std::fs::read_to_string(dir.path().join(FAVORITES_KEY)).unwrap();
        assert_eq!(raw, r#"["Alpha"]"#);
        let raw = std::fs::read_to_string(dir.path().join(THEME_KEY)).unwrap();
        assert_eq!(raw, r#""light""#);
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut favorites = Favorites::default();
        assert!(favorites.toggle("Alpha"));
        assert!(favorites.contains("Alpha"));
        assert!(!favorites.toggle("Alpha"));
        assert!(!favorites.contains("Alpha"));
        assert!(favorites.is_empty());
    }
}
