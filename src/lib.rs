/*!
 * Reactive VFS Library
 * Live, cache-backed views of a pluggable filesystem
 */

pub mod monitoring;
pub mod reactive;
pub mod vfs;

// Re-exports
pub use monitoring::init_tracing;
pub use reactive::{Resource, ResourceState, Signal, Subscription};
pub use vfs::{
    create_file_system, Adapter, AsyncAdapter, AsyncReactiveFs, Deferred, FileSystem, FsConfig,
    FsEvent, Kind, LocalFS, MemFS, ReactiveFs, SyncAdapter, TokioFS, VfsError, VfsResult,
};
