/*!
 * VFS Traits
 * Storage adapter contracts consumed by the reactive filesystems
 */

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use super::types::*;

/// Synchronous storage adapter
///
/// Adapters do no caching and no notification; the reactive layer owns both.
/// Paths are handed over in normalized form (no leading slash, root is `""`).
pub trait SyncAdapter: Send + Sync {
    /// Kind of the object at `path`, `None` if nothing is there
    fn get_type(&self, path: &str) -> Option<Kind>;

    /// Base-names of the children of `path`
    fn read_dir(&self, path: &str) -> VfsResult<Vec<String>>;

    fn read_file(&self, path: &str) -> VfsResult<String>;

    /// Create or overwrite a file
    fn write_file(&self, path: &str, data: &str) -> VfsResult<()>;

    fn mkdir(&self, path: &str) -> VfsResult<()>;

    /// Remove a file or a whole directory tree
    fn rm(&self, path: &str) -> VfsResult<()>;

    /// Whether `rename` is implemented natively
    fn supports_rename(&self) -> bool {
        false
    }

    /// Move `previous` to `next`, replacing an existing destination of the
    /// same kind (a directory is replaced, not merged into)
    fn rename(&self, previous: &str, _next: &str) -> VfsResult<()> {
        Err(VfsError::NotSupported(format!("rename of {}", previous)))
    }
}

/// Asynchronous storage adapter
///
/// Same contract as [`SyncAdapter`], every operation deferred.
#[async_trait]
pub trait AsyncAdapter: Send + Sync {
    async fn get_type(&self, path: &str) -> Option<Kind>;

    async fn read_dir(&self, path: &str) -> VfsResult<Vec<String>>;

    async fn read_file(&self, path: &str) -> VfsResult<String>;

    async fn write_file(&self, path: &str, data: &str) -> VfsResult<()>;

    async fn mkdir(&self, path: &str) -> VfsResult<()>;

    async fn rm(&self, path: &str) -> VfsResult<()>;

    fn supports_rename(&self) -> bool {
        false
    }

    /// See [`SyncAdapter::rename`]
    async fn rename(&self, previous: &str, _next: &str) -> VfsResult<()> {
        Err(VfsError::NotSupported(format!("rename of {}", previous)))
    }
}

/// Adapter tagged by its calling convention
#[derive(Clone)]
pub enum Adapter {
    Sync(Arc<dyn SyncAdapter>),
    Async(Arc<dyn AsyncAdapter>),
}

impl Adapter {
    pub fn sync<A: SyncAdapter + 'static>(adapter: A) -> Self {
        Adapter::Sync(Arc::new(adapter))
    }

    pub fn r#async<A: AsyncAdapter + 'static>(adapter: A) -> Self {
        Adapter::Async(Arc::new(adapter))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Adapter::Async(_))
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adapter::Sync(_) => f.write_str("Adapter::Sync"),
            Adapter::Async(_) => f.write_str("Adapter::Async"),
        }
    }
}

impl<A: SyncAdapter + ?Sized> SyncAdapter for Arc<A> {
    fn get_type(&self, path: &str) -> Option<Kind> {
        (**self).get_type(path)
    }

    fn read_dir(&self, path: &str) -> VfsResult<Vec<String>> {
        (**self).read_dir(path)
    }

    fn read_file(&self, path: &str) -> VfsResult<String> {
        (**self).read_file(path)
    }

    fn write_file(&self, path: &str, data: &str) -> VfsResult<()> {
        (**self).write_file(path, data)
    }

    fn mkdir(&self, path: &str) -> VfsResult<()> {
        (**self).mkdir(path)
    }

    fn rm(&self, path: &str) -> VfsResult<()> {
        (**self).rm(path)
    }

    fn supports_rename(&self) -> bool {
        (**self).supports_rename()
    }

    fn rename(&self, previous: &str, next: &str) -> VfsResult<()> {
        (**self).rename(previous, next)
    }
}
