/*!
 * Path-Indexed Cache Maps
 * One map per operation kind, keyed by normalized path
 *
 * Map guards are never held while a cell is written: every accessor clones
 * the cell handle out and releases the shard lock before returning, so cell
 * subscribers are free to call back into the filesystem.
 */

use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::paths;

/// Map from normalized path to a shared cell handle
pub(crate) struct CacheMap<C> {
    entries: DashMap<String, C, RandomState>,
}

impl<C: Clone> CacheMap<C> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(RandomState::new()),
        }
    }

    pub fn get(&self, path: &str) -> Option<C> {
        self.entries.get(path).map(|cell| cell.value().clone())
    }

    /// Return the cell for `path`, creating it with `create` on first access
    ///
    /// The flag is true when this call created the entry. At most one entry
    /// ever exists per path, even under concurrent first access.
    pub fn get_or_insert_with(&self, path: &str, create: impl FnOnce() -> C) -> (C, bool) {
        match self.entries.entry(path.to_string()) {
            Entry::Occupied(occupied) => (occupied.get().clone(), false),
            Entry::Vacant(vacant) => {
                let cell = create();
                vacant.insert(cell.clone());
                (cell, true)
            }
        }
    }

    pub fn remove(&self, path: &str) -> Option<C> {
        self.entries.remove(path).map(|(_, cell)| cell)
    }

    /// Paths of `path` itself and every cached descendant
    pub fn subtree_keys(&self, path: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.key() == path || paths::is_descendant(path, entry.key()))
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Remove `path` and every cached descendant, returning what was removed
    pub fn remove_subtree(&self, path: &str) -> Vec<(String, C)> {
        self.subtree_keys(path)
            .into_iter()
            .filter_map(|key| self.entries.remove(&key))
            .collect()
    }

    /// Sorted snapshot of the cached paths
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The three caches owned by one filesystem instance
pub(crate) struct PathCache<Ty, Ls, Ct> {
    /// path -> kind of object at that path
    pub types: CacheMap<Ty>,
    /// directory -> child base-names
    pub listings: CacheMap<Ls>,
    /// file -> content
    pub contents: CacheMap<Ct>,
}

impl<Ty: Clone, Ls: Clone, Ct: Clone> PathCache<Ty, Ls, Ct> {
    pub fn new() -> Self {
        Self {
            types: CacheMap::new(),
            listings: CacheMap::new(),
            contents: CacheMap::new(),
        }
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            types: self.types.keys(),
            listings: self.listings.keys(),
            contents: self.contents.keys(),
        }
    }
}

/// Which paths currently have a cache entry, per map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub types: Vec<String>,
    pub listings: Vec<String>,
    pub contents: Vec<String>,
}

impl CacheSnapshot {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.listings.is_empty() && self.contents.is_empty()
    }
}
