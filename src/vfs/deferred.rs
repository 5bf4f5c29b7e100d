/*!
 * Deferred Adapter
 * Lifts a synchronous adapter into the async contract
 */

use async_trait::async_trait;

use super::traits::{AsyncAdapter, SyncAdapter};
use super::types::*;

/// Async view of a [`SyncAdapter`]
///
/// Each call yields to the scheduler before touching the inner adapter, so
/// concurrent operations really interleave at every await point.
#[derive(Debug, Clone, Default)]
pub struct Deferred<A> {
    inner: A,
}

impl<A: SyncAdapter> Deferred<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

#[async_trait]
impl<A: SyncAdapter> AsyncAdapter for Deferred<A> {
    async fn get_type(&self, path: &str) -> Option<Kind> {
        tokio::task::yield_now().await;
        self.inner.get_type(path)
    }

    async fn read_dir(&self, path: &str) -> VfsResult<Vec<String>> {
        tokio::task::yield_now().await;
        self.inner.read_dir(path)
    }

    async fn read_file(&self, path: &str) -> VfsResult<String> {
        tokio::task::yield_now().await;
        self.inner.read_file(path)
    }

    async fn write_file(&self, path: &str, data: &str) -> VfsResult<()> {
        tokio::task::yield_now().await;
        self.inner.write_file(path, data)
    }

    async fn mkdir(&self, path: &str) -> VfsResult<()> {
        tokio::task::yield_now().await;
        self.inner.mkdir(path)
    }

    async fn rm(&self, path: &str) -> VfsResult<()> {
        tokio::task::yield_now().await;
        self.inner.rm(path)
    }

    fn supports_rename(&self) -> bool {
        self.inner.supports_rename()
    }

    async fn rename(&self, previous: &str, next: &str) -> VfsResult<()> {
        tokio::task::yield_now().await;
        self.inner.rename(previous, next)
    }
}
