/*!
 * Reactive Virtual File System
 * Path-indexed reactive caches over pluggable storage adapters
 */

pub mod async_fs;
mod cache;
pub mod config;
pub mod deferred;
pub mod factory;
pub mod local;
pub mod memory;
pub mod observable;
pub mod paths;
pub mod reactive_fs;
mod relocate;
pub mod rsync;
pub mod tokio_fs;
pub mod traits;
pub mod types;

// Re-exports
pub use async_fs::AsyncReactiveFs;
pub use cache::CacheSnapshot;
pub use config::FsConfig;
pub use deferred::Deferred;
pub use factory::{create_file_system, FileSystem};
pub use local::LocalFS;
pub use memory::MemFS;
pub use observable::{EventBroadcaster, FsEvent};
pub use paths::limit_path;
pub use reactive_fs::ReactiveFs;
pub use rsync::{rsync, rsync_async};
pub use tokio_fs::TokioFS;
pub use traits::{Adapter, AsyncAdapter, SyncAdapter};
pub use types::{Kind, VfsError, VfsResult};
