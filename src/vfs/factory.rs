/*!
 * Filesystem Factory
 * Picks the sync or async reactive layer from the adapter's calling convention
 */

use tracing::info;

use super::async_fs::AsyncReactiveFs;
use super::config::FsConfig;
use super::reactive_fs::ReactiveFs;
use super::traits::Adapter;
use super::types::*;

/// A reactive filesystem of either flavour
#[derive(Debug, Clone)]
pub enum FileSystem {
    Sync(ReactiveFs),
    Async(AsyncReactiveFs),
}

impl FileSystem {
    pub fn is_async(&self) -> bool {
        matches!(self, FileSystem::Async(_))
    }

    pub fn as_sync(&self) -> Option<&ReactiveFs> {
        match self {
            FileSystem::Sync(fs) => Some(fs),
            FileSystem::Async(_) => None,
        }
    }

    pub fn as_async(&self) -> Option<&AsyncReactiveFs> {
        match self {
            FileSystem::Async(fs) => Some(fs),
            FileSystem::Sync(_) => None,
        }
    }
}

/// Wrap `adapter` in the matching reactive filesystem
///
/// Async adapters bind to the current tokio runtime and fail with
/// `NotSupported` outside one.
pub fn create_file_system(adapter: Adapter, config: FsConfig) -> VfsResult<FileSystem> {
    let fs = match adapter {
        Adapter::Sync(adapter) => FileSystem::Sync(ReactiveFs::from_arc(adapter, config)),
        Adapter::Async(adapter) => FileSystem::Async(AsyncReactiveFs::from_arc(adapter, config)?),
    };
    info!(is_async = fs.is_async(), "created reactive filesystem");
    Ok(fs)
}
