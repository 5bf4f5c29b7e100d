/*!
 * Reactive Filesystem (async)
 * Path-indexed resource cache over an asynchronous adapter
 *
 * Reads return a [`Resource`] shared per path and kick off a background
 * load on the bound runtime. Mutations await the adapter, then await the
 * refetches and mutates that bring every affected resource up to date, so
 * the cache is consistent once the returned future resolves.
 */

use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, instrument, trace};

use super::cache::{CacheSnapshot, PathCache};
use super::config::FsConfig;
use super::observable::{EventBroadcaster, FsEvent};
use super::paths;
use super::reactive_fs::check_rename;
use super::relocate::{move_tree_async, MoveEntry};
use super::traits::AsyncAdapter;
use super::types::*;
use crate::reactive::Resource;

type AsyncCache = PathCache<Resource<Option<Kind>>, Resource<Vec<String>>, Resource<String>>;

/// Reactive filesystem over an [`AsyncAdapter`]
///
/// Clones share the cache and the runtime handle.
pub struct AsyncReactiveFs<A: ?Sized = dyn AsyncAdapter> {
    adapter: Arc<A>,
    cache: Arc<AsyncCache>,
    events: EventBroadcaster,
    config: FsConfig,
    handle: Handle,
}

impl<A: ?Sized> Clone for AsyncReactiveFs<A> {
    fn clone(&self) -> Self {
        Self {
            adapter: Arc::clone(&self.adapter),
            cache: Arc::clone(&self.cache),
            events: self.events.clone(),
            config: self.config.clone(),
            handle: self.handle.clone(),
        }
    }
}

impl<A: ?Sized> fmt::Debug for AsyncReactiveFs<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncReactiveFs")
            .field("cached", &self.cache.snapshot())
            .field("config", &self.config)
            .finish()
    }
}

impl<A: AsyncAdapter + 'static> AsyncReactiveFs<A> {
    /// Bind to the current tokio runtime
    pub fn new(adapter: A) -> VfsResult<Self> {
        Self::from_arc(Arc::new(adapter), FsConfig::default())
    }

    pub fn with_config(adapter: A, config: FsConfig) -> VfsResult<Self> {
        Self::from_arc(Arc::new(adapter), config)
    }
}

impl<A: AsyncAdapter + ?Sized + 'static> AsyncReactiveFs<A> {
    /// Wrap a shared adapter, binding to the current tokio runtime
    ///
    /// Fails with `NotSupported` outside a runtime.
    pub fn from_arc(adapter: Arc<A>, config: FsConfig) -> VfsResult<Self> {
        let handle = Handle::try_current().map_err(|_| {
            VfsError::NotSupported("async filesystem needs a tokio runtime".to_string())
        })?;
        Ok(Self::with_handle(adapter, config, handle))
    }

    /// Wrap a shared adapter, loading resources on `handle`
    pub fn with_handle(adapter: Arc<A>, config: FsConfig, handle: Handle) -> Self {
        Self {
            adapter,
            cache: Arc::new(PathCache::new()),
            events: EventBroadcaster::new(config.event_capacity),
            config,
            handle,
        }
    }

    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FsEvent> {
        self.events.subscribe()
    }

    pub fn cached_paths(&self) -> CacheSnapshot {
        self.cache.snapshot()
    }

    /// Kind of `path`, initially `None` while the first load runs
    pub fn get_type(&self, path: &str) -> Resource<Option<Kind>> {
        let path = paths::normalize(path);
        let (resource, created) = self.type_resource(&path);
        self.revalidate(&resource, created, "type");
        resource
    }

    /// Child base-names of `path`, initially empty while the first load runs
    ///
    /// Adapter failures surface as the resource's `error`.
    pub fn read_dir(&self, path: &str) -> Resource<Vec<String>> {
        let path = paths::normalize(path);
        let (resource, created) = self.cache.listings.get_or_insert_with(&path, || {
            let adapter = Arc::clone(&self.adapter);
            let path = path.clone();
            Resource::new(Vec::new(), move || {
                let adapter = Arc::clone(&adapter);
                let path = path.clone();
                async move { adapter.read_dir(&path).await }
            })
        });
        self.revalidate(&resource, created, "listing");
        resource
    }

    /// Content of the file at `path`, initially empty while the first load runs
    pub fn read_file(&self, path: &str) -> Resource<String> {
        let path = paths::normalize(path);
        let (resource, created) = self.cache.contents.get_or_insert_with(&path, || {
            let adapter = Arc::clone(&self.adapter);
            let path = path.clone();
            Resource::new(String::new(), move || {
                let adapter = Arc::clone(&adapter);
                let path = path.clone();
                async move { adapter.read_file(&path).await }
            })
        });
        self.revalidate(&resource, created, "content");
        resource
    }

    /// Create `path`; resolves once every affected resource has reloaded
    #[instrument(skip(self))]
    pub async fn mkdir(&self, path: &str) -> VfsResult<()> {
        let path = paths::normalize(path);
        let existed = self.adapter.get_type(&path).await.is_some();

        self.adapter.mkdir(&path).await?;

        let mut types = Vec::new();
        let mut parents = Vec::new();
        for prefix in paths::ancestors(&path) {
            let (resource, _) = self.type_resource(&prefix);
            types.push(resource);
            parents.push(paths::normalize(&paths::parent_dir(&prefix)));
        }
        join_all(types.iter().map(|r| r.refetch())).await;
        self.refetch_listings(parents).await;

        if !existed {
            self.events.emit(FsEvent::Created {
                path,
                kind: Kind::Dir,
            });
        }
        Ok(())
    }

    /// Create or overwrite the file at `path`
    ///
    /// The cached content resource is set to `data` directly instead of
    /// being reloaded.
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn write_file(&self, path: &str, data: &str) -> VfsResult<()> {
        let path = paths::normalize(path);
        let is_new = self.adapter.get_type(&path).await.is_none();

        self.adapter.write_file(&path, data).await?;

        if let Some(resource) = self.cache.contents.get(&path) {
            resource.mutate(data.to_string());
        }

        if is_new {
            if let Some(resource) = self.cache.types.get(&path) {
                resource.mutate(Some(Kind::File));
            }
            self.refetch_listings([paths::normalize(&paths::parent_dir(&path))])
                .await;
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
    pub async fn rm(&self, path: &str) -> VfsResult<()> {
        let path = paths::normalize(path);

        self.adapter.rm(&path).await?;
        self.invalidate_subtree(&path);
        self.refetch_listings([paths::normalize(&paths::parent_dir(&path))])
            .await;

        self.events.emit(FsEvent::Deleted { path });
        Ok(())
    }

    /// Move `previous` to `next`
    ///
    /// Both kinds are read before anything is mutated. Another task may
    /// change either path between that check and the move itself.
    #[instrument(skip(self))]
    pub async fn rename(&self, previous: &str, next: &str) -> VfsResult<()> {
        let previous = paths::normalize(previous);
        let next = paths::normalize(next);
        if previous == next {
            return Ok(());
        }

        let (kind, existing) = futures::join!(
            self.adapter.get_type(&previous),
            self.adapter.get_type(&next)
        );
        let kind = kind.ok_or_else(|| VfsError::NotFound(previous.clone()))?;
        check_rename(&previous, kind, &next, existing)?;

        if self.adapter.supports_rename() {
            self.adapter.rename(&previous, &next).await?;
        } else {
            move_tree_async(&*self.adapter, MoveEntry::new(kind, previous.clone()), next.clone())
                .await?;
        }

        self.invalidate_subtree(&previous);
        self.refresh_subtree(&next).await;
        self.refetch_listings([
            paths::normalize(&paths::parent_dir(&previous)),
            paths::normalize(&paths::parent_dir(&next)),
        ])
        .await;

        self.events.emit(FsEvent::Renamed {
            from: previous,
            to: next,
        });
        Ok(())
    }

    fn type_resource(&self, path: &str) -> (Resource<Option<Kind>>, bool) {
        self.cache.types.get_or_insert_with(path, || {
            let adapter = Arc::clone(&self.adapter);
            let path = path.to_string();
            Resource::new(None, move || {
                let adapter = Arc::clone(&adapter);
                let path = path.clone();
                async move { Ok(adapter.get_type(&path).await) }
            })
        })
    }

    /// Start a load for a fresh resource, or a reload when revalidating
    fn revalidate<T>(&self, resource: &Resource<T>, created: bool, what: &str)
    where
        T: Clone + Send + Sync + 'static,
    {
        if created {
            debug!(what, "cached resource");
            resource.spawn_refetch(&self.handle);
        } else if self.config.revalidate_on_read {
            resource.spawn_refetch(&self.handle);
        } else {
            trace!(what, "resource cache hit");
        }
    }

    /// Refetch every listing among `dirs` that is cached
    async fn refetch_listings(&self, dirs: impl IntoIterator<Item = String>) {
        let mut cached: Vec<Resource<Vec<String>>> = Vec::new();
        for dir in dirs {
            if let Some(resource) = self.cache.listings.get(&dir) {
                if !cached.iter().any(|r| r.ptr_eq(&resource)) {
                    cached.push(resource);
                }
            }
        }
        join_all(cached.iter().map(|r| r.refetch())).await;
    }

    fn invalidate_subtree(&self, path: &str) {
        let removed = self.cache.types.remove_subtree(path);
        debug!(path, count = removed.len(), "invalidated type resources");
        for (_, resource) in removed {
            resource.mutate(None);
        }
        self.cache.listings.remove_subtree(path);
        self.cache.contents.remove_subtree(path);
    }

    /// Reload every cached resource at and below `path`
    async fn refresh_subtree(&self, path: &str) {
        let types: Vec<_> = self
            .cache
            .types
            .subtree_keys(path)
            .iter()
            .filter_map(|k| self.cache.types.get(k))
            .collect();
        let listings: Vec<_> = self
            .cache
            .listings
            .subtree_keys(path)
            .iter()
            .filter_map(|k| self.cache.listings.get(k))
            .collect();
        let contents: Vec<_> = self
            .cache
            .contents
            .subtree_keys(path)
            .iter()
            .filter_map(|k| self.cache.contents.get(k))
            .collect();

        futures::join!(
            join_all(types.iter().map(|r| r.refetch())),
            join_all(listings.iter().map(|r| r.refetch())),
            join_all(contents.iter().map(|r| r.refetch())),
        );
    }
}
