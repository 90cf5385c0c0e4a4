//! Favorite dishes, persisted as a JSON array of ids under one storage key.
//!
//! Storage is best-effort: a missing, corrupt or unreachable store reads as
//! an empty set, and a failed write is logged and dropped. Every toggle is a
//! whole-set read-modify-write, so concurrent writers (two tabs) resolve as
//! last writer wins.

use crate::host::KeyValueStore;
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const DEFAULT_STORAGE_KEY: &str = "ivory-favorites";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

#[derive(Debug, Clone)]
pub struct Favorites {
    key: String,
}

impl Default for Favorites {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl Favorites {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self, store: &impl KeyValueStore) -> BTreeSet<String> {
        let raw = match store.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "could not read favorites");
                return BTreeSet::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "ignoring corrupt favorites");
                BTreeSet::new()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore, ids: &BTreeSet<String>) {
        let encoded = match serde_json::to_string(ids) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %self.key, error = %e, "could not encode favorites");
                return;
            }
        };
        if let Err(e) = store.write(&self.key, &encoded) {
            warn!(key = %self.key, error = %e, "could not save favorites");
        }
    }

    pub fn contains(&self, store: &impl KeyValueStore, id: &str) -> bool {
        self.load(store).contains(id)
    }

    /// Add `id` if absent, remove it if present, and persist the result.
    pub fn toggle(&self, store: &mut impl KeyValueStore, id: &str) -> FavoriteChange {
        let mut ids = self.load(store);
        let change = if ids.remove(id) {
            FavoriteChange::Removed
        } else {
            ids.insert(id.to_string());
            FavoriteChange::Added
        };
        self.save(store, &ids);
        debug!(dish = %id, ?change, count = ids.len(), "toggle favorite");
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FileStore, HeadlessHost};

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut host = HeadlessHost::new();
        let favorites = Favorites::default();

        assert_eq!(favorites.toggle(&mut host, "ceviche-tropical"), FavoriteChange::Added);
        assert_eq!(host.raw(DEFAULT_STORAGE_KEY), Some(r#"["ceviche-tropical"]"#));
        assert!(favorites.contains(&host, "ceviche-tropical"));

        assert_eq!(favorites.toggle(&mut host, "ceviche-tropical"), FavoriteChange::Removed);
        assert_eq!(host.raw(DEFAULT_STORAGE_KEY), Some("[]"));
        assert!(favorites.load(&host).is_empty());
    }

    #[test]
    fn absent_key_loads_empty() {
        let host = HeadlessHost::new();
        assert!(Favorites::default().load(&host).is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty_and_is_overwritten() {
        let mut host = HeadlessHost::new();
        host.put_raw(DEFAULT_STORAGE_KEY, "{not json");
        let favorites = Favorites::default();

        assert!(favorites.load(&host).is_empty());
        assert_eq!(favorites.toggle(&mut host, "a"), FavoriteChange::Added);
        assert_eq!(favorites.load(&host), set(&["a"]));
    }

    #[test]
    fn duplicates_in_stored_array_collapse() {
        let mut host = HeadlessHost::new();
        host.put_raw(DEFAULT_STORAGE_KEY, r#"["b","a","b"]"#);
        assert_eq!(Favorites::default().load(&host), set(&["a", "b"]));
    }

    #[test]
    fn unavailable_storage_degrades_silently() {
        let mut host = HeadlessHost::new();
        host.set_storage_available(false);
        let favorites = Favorites::default();

        assert_eq!(favorites.toggle(&mut host, "a"), FavoriteChange::Added);
        assert!(favorites.load(&host).is_empty());

        host.set_storage_available(true);
        assert!(favorites.load(&host).is_empty());
    }

    #[test]
    fn custom_key_is_isolated() {
        let mut host = HeadlessHost::new();
        let mine = Favorites::new("my-favs");
        mine.toggle(&mut host, "a");
        assert!(Favorites::default().load(&host).is_empty());
        assert_eq!(mine.load(&host), set(&["a"]));
    }

    #[test]
    fn last_writer_wins_across_sessions() {
        let mut host = HeadlessHost::new();
        let favorites = Favorites::default();

        // Two sessions read the same starting set, then each writes its own.
        let mut tab_one = favorites.load(&host);
        let mut tab_two = favorites.load(&host);
        tab_one.insert("a".to_string());
        tab_two.insert("b".to_string());
        favorites.save(&mut host, &tab_one);
        favorites.save(&mut host, &tab_two);

        assert_eq!(favorites.load(&host), set(&["b"]));
    }

    #[test]
    fn file_store_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("favorites.json");
        let favorites = Favorites::default();

        let mut store = FileStore::new(&path);
        favorites.toggle(&mut store, "pargo-rojo-grillado");
        favorites.toggle(&mut store, "ceviche-tropical");

        let reopened = FileStore::new(&path);
        assert_eq!(
            favorites.load(&reopened),
            set(&["ceviche-tropical", "pargo-rojo-grillado"])
        );
    }
}
