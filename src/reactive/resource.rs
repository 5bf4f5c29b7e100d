/*!
 * Resource - Asynchronous Observable Cell
 * Loading/error state over a zero-argument loader with refetch and mutate
 */

use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use super::signal::{Signal, Subscription};
use crate::vfs::types::{VfsError, VfsResult};

type Loader<T> = Arc<dyn Fn() -> BoxFuture<'static, VfsResult<T>> + Send + Sync>;

/// Snapshot of a resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Last successfully loaded (or mutated) value
    pub value: T,
    pub loading: bool,
    /// Error of the most recent settled load; cleared by a successful load or `mutate`
    pub error: Option<VfsError>,
}

struct ResourceInner<T> {
    state: Signal<ResourceState<T>>,
    loader: Loader<T>,
    generation: AtomicU64,
    loading_tx: watch::Sender<bool>,
}

/// Async reactive cell
///
/// Every fetch is stamped with a generation number; only the newest
/// generation may settle the state, so overlapping refetches resolve
/// latest-wins and a `mutate` discards whatever load was in flight.
pub struct Resource<T> {
    inner: Arc<ResourceInner<T>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug + Clone + Send + Sync + 'static> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("state", &self.inner.state.get())
            .field("generation", &self.inner.generation.load(Ordering::Acquire))
            .finish()
    }
}

impl<T> Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an idle resource; nothing is loaded until a refetch
    pub fn new<F, Fut>(initial: T, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = VfsResult<T>> + Send + 'static,
    {
        let (loading_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(ResourceInner {
                state: Signal::new(ResourceState {
                    value: initial,
                    loading: false,
                    error: None,
                }),
                loader: Arc::new(move || loader().boxed()),
                generation: AtomicU64::new(0),
                loading_tx,
            }),
        }
    }

    /// Current value (the last settled one while a load is in flight)
    pub fn get(&self) -> T {
        self.inner.state.with(|s| s.value.clone())
    }

    pub fn loading(&self) -> bool {
        self.inner.state.with(|s| s.loading)
    }

    pub fn error(&self) -> Option<VfsError> {
        self.inner.state.with(|s| s.error.clone())
    }

    pub fn state(&self) -> ResourceState<T> {
        self.inner.state.get()
    }

    /// Number of state transitions since creation
    pub fn version(&self) -> u64 {
        self.inner.state.version()
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&ResourceState<T>) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.state.subscribe(callback)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run the loader and wait for the state to settle
    ///
    /// Inside a tokio runtime the load runs as its own task, so dropping this
    /// future stops the wait but not the load. Elsewhere it runs inline and a
    /// dropped future clears the loading flag it raised.
    pub async fn refetch(&self) {
        let generation = self.begin();
        match Handle::try_current() {
            Ok(handle) => {
                let this = self.clone();
                if let Err(e) = handle.spawn(async move { this.load(generation).await }).await {
                    warn!(error = %e, "resource load task failed");
                }
            }
            Err(_) => self.load(generation).await,
        }
    }

    /// Mark the resource loading now and run the loader on `handle`
    ///
    /// The loading flag is raised before this returns, so `settled()` called
    /// right after observes the pending load.
    pub fn spawn_refetch(&self, handle: &Handle) {
        let generation = self.begin();
        let this = self.clone();
        handle.spawn(async move {
            this.load(generation).await;
        });
    }

    /// Overwrite the value without a round trip to the loader
    pub fn mutate(&self, value: T) {
        let inner = &self.inner;
        inner.state.update_if(move |_| {
            inner.generation.fetch_add(1, Ordering::AcqRel);
            inner.loading_tx.send_replace(false);
            Some(ResourceState {
                value,
                loading: false,
                error: None,
            })
        });
    }

    /// Wait until no load is pending
    pub async fn settled(&self) {
        let mut rx = self.inner.loading_tx.subscribe();
        // The sender lives as long as `self`, so this only returns Err on drop
        let _ = rx.wait_for(|loading| !*loading).await;
    }

    fn begin(&self) -> u64 {
        let inner = &self.inner;
        let mut generation = 0;
        inner.state.update_if(|s| {
            generation = inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
            inner.loading_tx.send_replace(true);
            Some(ResourceState {
                value: s.value.clone(),
                loading: true,
                error: s.error.clone(),
            })
        });
        generation
    }

    async fn load(&self, generation: u64) {
        let mut pending = PendingLoad {
            resource: self,
            generation,
            finished: false,
        };
        let result = (self.inner.loader)().await;
        pending.finished = true;
        let inner = &self.inner;

        let applied = inner.state.update_if(|s| {
            if inner.generation.load(Ordering::Acquire) != generation {
                return None;
            }
            inner.loading_tx.send_replace(false);
            Some(match result {
                Ok(value) => ResourceState {
                    value,
                    loading: false,
                    error: None,
                },
                Err(e) => {
                    warn!(error = %e, "resource load failed");
                    ResourceState {
                        value: s.value.clone(),
                        loading: false,
                        error: Some(e),
                    }
                }
            })
        });

        if !applied {
            trace!(generation, "discarded stale resource load");
        }
    }

    /// Lower the loading flag for a load that will never settle
    fn abandon(&self, generation: u64) {
        let inner = &self.inner;
        let cleared = inner.state.update_if(|s| {
            if inner.generation.load(Ordering::Acquire) != generation {
                return None;
            }
            inner.loading_tx.send_replace(false);
            Some(ResourceState {
                value: s.value.clone(),
                loading: false,
                error: s.error.clone(),
            })
        });
        if cleared {
            debug!(generation, "resource load cancelled");
        }
    }
}

/// Clears the loading flag when a load is dropped before it settles
struct PendingLoad<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    resource: &'a Resource<T>,
    generation: u64,
    finished: bool,
}

impl<T> Drop for PendingLoad<'_, T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if !self.finished {
            self.resource.abandon(self.generation);
        }
    }
}
