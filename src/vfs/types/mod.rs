/*!
 * VFS Types
 * Shared types for reactive filesystem operations
 */

mod errors;
mod kind;

pub use errors::{VfsError, VfsResult};
pub use kind::Kind;
