/*!
 * Reactive Filesystem (sync)
 * Path-indexed signal cache over a synchronous adapter
 *
 * Reads hand out live [`Signal`]s that are shared per path. Every mutation
 * calls the adapter first and, once it succeeded, repairs the affected cells
 * before returning: the mutated path, its descendants and the listing of its
 * parent directory.
 */

use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, instrument, trace};

use super::cache::{CacheMap, CacheSnapshot, PathCache};
use super::config::FsConfig;
use super::observable::{EventBroadcaster, FsEvent};
use super::paths;
use super::relocate::{move_tree, MoveEntry};
use super::traits::SyncAdapter;
use super::types::*;
use crate::reactive::Signal;

type SyncCache = PathCache<Signal<Option<Kind>>, Signal<Vec<String>>, Signal<String>>;

/// Reactive filesystem over a [`SyncAdapter`]
///
/// Clones share the cache, so every clone hands out the same cells.
pub struct ReactiveFs<A: ?Sized = dyn SyncAdapter> {
    adapter: Arc<A>,
    cache: Arc<SyncCache>,
    events: EventBroadcaster,
    config: FsConfig,
}

impl<A: ?Sized> Clone for ReactiveFs<A> {
    fn clone(&self) -> Self {
        Self {
            adapter: Arc::clone(&self.adapter),
            cache: Arc::clone(&self.cache),
            events: self.events.clone(),
            config: self.config.clone(),
        }
    }
}

impl<A: ?Sized> fmt::Debug for ReactiveFs<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveFs")
            .field("cached", &self.cache.snapshot())
            .field("config", &self.config)
            .finish()
    }
}

impl<A: SyncAdapter> ReactiveFs<A> {
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, FsConfig::default())
    }

    pub fn with_config(adapter: A, config: FsConfig) -> Self {
        Self::from_arc(Arc::new(adapter), config)
    }
}

impl<A: SyncAdapter + ?Sized> ReactiveFs<A> {
    /// Wrap an adapter that is already shared
    pub fn from_arc(adapter: Arc<A>, config: FsConfig) -> Self {
        Self {
            adapter,
            cache: Arc::new(PathCache::new()),
            events: EventBroadcaster::new(config.event_capacity),
            config,
        }
    }

    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Receive a [`FsEvent`] for every successful mutation
    pub fn subscribe_events(&self) -> broadcast::Receiver<FsEvent> {
        self.events.subscribe()
    }

    /// Paths that currently own a cell, per cache map
    pub fn cached_paths(&self) -> CacheSnapshot {
        self.cache.snapshot()
    }

    /// Live kind of `path` (`None` when nothing is there); never fails
    pub fn get_type(&self, path: &str) -> Signal<Option<Kind>> {
        let path = paths::normalize(path);

        if !self.config.revalidate_on_read {
            if let Some(cell) = self.cache.types.get(&path) {
                trace!(path = %path, "type cache hit");
                return cell;
            }
        }

        let kind = self.adapter.get_type(&path);
        let (cell, created) = self
            .cache
            .types
            .get_or_insert_with(&path, || Signal::new(kind));
        if created {
            debug!(path = %path, ?kind, "cached type");
        } else {
            cell.set(kind);
        }
        cell
    }

    /// Live child base-names of the directory at `path`
    pub fn read_dir(&self, path: &str) -> VfsResult<Signal<Vec<String>>> {
        let path = paths::normalize(path);

        if !self.config.revalidate_on_read {
            if let Some(cell) = self.cache.listings.get(&path) {
                trace!(path = %path, "listing cache hit");
                return Ok(cell);
            }
        }

        let names = self.adapter.read_dir(&path)?;
        Ok(Self::seed(&self.cache.listings, &path, names))
    }

    /// Live content of the file at `path`
    pub fn read_file(&self, path: &str) -> VfsResult<Signal<String>> {
        let path = paths::normalize(path);

        if !self.config.revalidate_on_read {
            if let Some(cell) = self.cache.contents.get(&path) {
                trace!(path = %path, "content cache hit");
                return Ok(cell);
            }
        }

        let data = self.adapter.read_file(&path)?;
        Ok(Self::seed(&self.cache.contents, &path, data))
    }

    /// Create `path` (and any missing ancestors the adapter creates)
    #[instrument(skip(self))]
    pub fn mkdir(&self, path: &str) -> VfsResult<()> {
        let path = paths::normalize(path);
        let existed = self.adapter.get_type(&path).is_some();

        self.adapter.mkdir(&path)?;
        self.link_ancestors(&path, Kind::Dir);

        if !existed {
            self.events.emit(FsEvent::Created {
                path,
                kind: Kind::Dir,
            });
        }
        Ok(())
    }

    /// Create or overwrite the file at `path`
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub fn write_file(&self, path: &str, data: &str) -> VfsResult<()> {
        let path = paths::normalize(path);
        let is_new = self.adapter.get_type(&path).is_none();

        self.adapter.write_file(&path, data)?;

        if let Some(cell) = self.cache.contents.get(&path) {
            cell.set(data.to_string());
        }

        if is_new {
            let (cell, created) = self
                .cache
                .types
                .get_or_insert_with(&path, || Signal::new(Some(Kind::File)));
            if !created {
                cell.set(Some(Kind::File));
            }
            self.link_ancestors(&path, Kind::File);
            self.events.emit(FsEvent::Created {
                path,
                kind: Kind::File,
            });
        } else {
            self.events.emit(FsEvent::Modified { path });
        }
        Ok(())
    }

    /// Remove a file or a directory tree
    #[instrument(skip(self))]
    pub fn rm(&self, path: &str) -> VfsResult<()> {
        let path = paths::normalize(path);

        self.adapter.rm(&path)?;
        self.invalidate_subtree(&path);
        self.unlink(&path);

        self.events.emit(FsEvent::Deleted { path });
        Ok(())
    }

    /// Move `previous` to `next`
    ///
    /// Kind conflicts at the destination are rejected before the adapter is
    /// touched. Without native rename support the tree is copied node by node
    /// and the source removed afterwards.
    #[instrument(skip(self))]
    pub fn rename(&self, previous: &str, next: &str) -> VfsResult<()> {
        let previous = paths::normalize(previous);
        let next = paths::normalize(next);
        if previous == next {
            return Ok(());
        }

        let kind = self
            .adapter
            .get_type(&previous)
            .ok_or_else(|| VfsError::NotFound(previous.clone()))?;
        check_rename(&previous, kind, &next, self.adapter.get_type(&next))?;

        if self.adapter.supports_rename() {
            self.adapter.rename(&previous, &next)?;
        } else {
            move_tree(&*self.adapter, MoveEntry::new(kind, previous.clone()), &next)?;
        }

        self.invalidate_subtree(&previous);
        self.unlink(&previous);
        self.refresh_subtree(&next);
        self.link_ancestors(&next, kind);

        self.events.emit(FsEvent::Renamed {
            from: previous,
            to: next,
        });
        Ok(())
    }

    fn seed<T>(map: &CacheMap<Signal<T>>, path: &str, value: T) -> Signal<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let (cell, created) = map.get_or_insert_with(path, || Signal::new(value.clone()));
        if created {
            debug!(path, "cached cell");
        } else {
            cell.set(value);
        }
        cell
    }

    /// Mark `path` as `kind` and its ancestors as directories, listing each
    /// one in its parent
    fn link_ancestors(&self, path: &str, kind: Kind) {
        for prefix in paths::ancestors(path) {
            let expected = Some(if prefix == path { kind } else { Kind::Dir });
            if let Some(cell) = self.cache.types.get(&prefix) {
                cell.update_if(|current| (*current != expected).then_some(expected));
            }

            let parent = paths::normalize(&paths::parent_dir(&prefix));
            if let Some(listing) = self.cache.listings.get(&parent) {
                let name = paths::base_name(&prefix).to_string();
                listing.update_if(|names| {
                    if names.contains(&name) {
                        return None;
                    }
                    let mut updated = names.clone();
                    updated.push(name);
                    Some(updated)
                });
            }
        }
    }

    /// Drop `path` from its parent's listing
    fn unlink(&self, path: &str) {
        let parent = paths::normalize(&paths::parent_dir(path));
        if let Some(listing) = self.cache.listings.get(&parent) {
            let name = paths::base_name(path);
            listing.update_if(|names| {
                if !names.iter().any(|n| n == name) {
                    return None;
                }
                Some(names.iter().filter(|n| *n != name).cloned().collect())
            });
        }
    }

    /// Set type cells at and below `path` to `None` and evict every cell there
    fn invalidate_subtree(&self, path: &str) {
        let removed = self.cache.types.remove_subtree(path);
        debug!(path, count = removed.len(), "invalidated type cells");
        for (_, cell) in removed {
            cell.set(None);
        }
        self.cache.listings.remove_subtree(path);
        self.cache.contents.remove_subtree(path);
    }

    /// Re-read every cached cell at and below `path`
    fn refresh_subtree(&self, path: &str) {
        for key in self.cache.types.subtree_keys(path) {
            if let Some(cell) = self.cache.types.get(&key) {
                cell.set(self.adapter.get_type(&key));
            }
        }
        for key in self.cache.listings.subtree_keys(path) {
            match self.adapter.read_dir(&key) {
                Ok(names) => {
                    if let Some(cell) = self.cache.listings.get(&key) {
                        cell.set(names);
                    }
                }
                Err(_) => {
                    self.cache.listings.remove(&key);
                }
            }
        }
        for key in self.cache.contents.subtree_keys(path) {
            match self.adapter.read_file(&key) {
                Ok(data) => {
                    if let Some(cell) = self.cache.contents.get(&key) {
                        cell.set(data);
                    }
                }
                Err(_) => {
                    self.cache.contents.remove(&key);
                }
            }
        }
    }
}

/// Reject renames that would overwrite one kind with the other, or move a
/// path into its own subtree or over one of its ancestors
pub(crate) fn check_rename(
    previous: &str,
    kind: Kind,
    next: &str,
    existing: Option<Kind>,
) -> VfsResult<()> {
    if paths::is_descendant(previous, next) {
        return Err(VfsError::InvalidPath(format!(
            "cannot move {} into itself",
            previous
        )));
    }
    if paths::is_descendant(next, previous) {
        return Err(VfsError::InvalidPath(format!(
            "cannot move {} over its ancestor {}",
            previous, next
        )));
    }
    match (kind, existing) {
        (Kind::Dir, Some(Kind::File)) => {
            Err(VfsError::CannotOverwriteFileWithDirectory(next.to_string()))
        }
        (Kind::File, Some(Kind::Dir)) => {
            Err(VfsError::CannotOverwriteDirectoryWithFile(next.to_string()))
        }
        _ => Ok(()),
    }
}
