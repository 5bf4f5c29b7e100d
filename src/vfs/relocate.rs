/*!
 * Rename Fallback
 * Copy-then-delete move for adapters without a native rename
 *
 * An existing destination is replaced, never merged into, matching what the
 * native renames do.
 *
 * Not atomic: a failure half way leaves the moved part at the destination
 * and the rest at the source. No rollback is attempted.
 */

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::trace;

use super::paths;
use super::traits::{AsyncAdapter, SyncAdapter};
use super::types::*;

/// A node of the tree being moved, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MoveEntry {
    File(String),
    Dir(String),
}

impl MoveEntry {
    pub fn new(kind: Kind, path: impl Into<String>) -> Self {
        match kind {
            Kind::File => MoveEntry::File(path.into()),
            Kind::Dir => MoveEntry::Dir(path.into()),
        }
    }
}

/// Move `entry` to `next` one node at a time
pub(crate) fn move_tree<A>(adapter: &A, entry: MoveEntry, next: &str) -> VfsResult<()>
where
    A: SyncAdapter + ?Sized,
{
    trace!(?entry, next, "moving without native rename");
    match entry {
        MoveEntry::File(path) => {
            let data = adapter.read_file(&path)?;
            adapter.write_file(next, &data)?;
            adapter.rm(&path)
        }
        MoveEntry::Dir(path) => {
            if adapter.get_type(next).is_some() {
                adapter.rm(next)?;
            }
            adapter.mkdir(next)?;
            for name in adapter.read_dir(&path)? {
                let child = paths::join(&path, &name);
                if let Some(kind) = adapter.get_type(&child) {
                    move_tree(adapter, MoveEntry::new(kind, child), &paths::join(next, &name))?;
                }
            }
            adapter.rm(&path)
        }
    }
}

/// Async counterpart of [`move_tree`]
pub(crate) fn move_tree_async<'a, A>(
    adapter: &'a A,
    entry: MoveEntry,
    next: String,
) -> BoxFuture<'a, VfsResult<()>>
where
    A: AsyncAdapter + ?Sized,
{
    async move {
        trace!(?entry, next = %next, "moving without native rename");
        match entry {
            MoveEntry::File(path) => {
                let data = adapter.read_file(&path).await?;
                adapter.write_file(&next, &data).await?;
                adapter.rm(&path).await
            }
            MoveEntry::Dir(path) => {
                if adapter.get_type(&next).await.is_some() {
                    adapter.rm(&next).await?;
                }
                adapter.mkdir(&next).await?;
                for name in adapter.read_dir(&path).await? {
                    let child = paths::join(&path, &name);
                    if let Some(kind) = adapter.get_type(&child).await {
                        let target = paths::join(&next, &name);
                        move_tree_async(adapter, MoveEntry::new(kind, child), target).await?;
                    }
                }
                adapter.rm(&path).await
            }
        }
    }
    .boxed()
}
