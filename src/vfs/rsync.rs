/*!
 * Tree Sync
 * Recursive copy of a file or directory between two adapters
 */

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use super::paths;
use super::traits::{AsyncAdapter, SyncAdapter};
use super::types::*;

/// Copy `src_path` from `src` to `dst_path` on `dst`
///
/// Files are read then written; directories are created then filled child by
/// child. Nothing already at the destination is removed.
pub fn rsync<S, D>(src: &S, src_path: &str, dst: &D, dst_path: &str) -> VfsResult<()>
where
    S: SyncAdapter + ?Sized,
    D: SyncAdapter + ?Sized,
{
    match src.get_type(src_path) {
        Some(Kind::File) => {
            let data = src.read_file(src_path)?;
            dst.write_file(dst_path, &data)
        }
        Some(Kind::Dir) => {
            dst.mkdir(dst_path)?;
            for name in src.read_dir(src_path)? {
                rsync(
                    src,
                    &paths::join(src_path, &name),
                    dst,
                    &paths::join(dst_path, &name),
                )?;
            }
            debug!(from = src_path, to = dst_path, "synced directory");
            Ok(())
        }
        None => Err(VfsError::NotFound(src_path.to_string())),
    }
}

/// Async counterpart of [`rsync`]
pub fn rsync_async<'a, S, D>(
    src: &'a S,
    src_path: &'a str,
    dst: &'a D,
    dst_path: &'a str,
) -> BoxFuture<'a, VfsResult<()>>
where
    S: AsyncAdapter + ?Sized,
    D: AsyncAdapter + ?Sized,
{
    async move {
        match src.get_type(src_path).await {
            Some(Kind::File) => {
                let data = src.read_file(src_path).await?;
                dst.write_file(dst_path, &data).await
            }
            Some(Kind::Dir) => {
                dst.mkdir(dst_path).await?;
                for name in src.read_dir(src_path).await? {
                    let from = paths::join(src_path, &name);
                    let to = paths::join(dst_path, &name);
                    rsync_async(src, &from, dst, &to).await?;
                }
                debug!(from = src_path, to = dst_path, "synced directory");
                Ok(())
            }
            None => Err(VfsError::NotFound(src_path.to_string())),
        }
    }
    .boxed()
}
