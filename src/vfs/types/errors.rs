/*!
 * VFS Error Types
 * Structured, type-safe error handling for reactive filesystem operations
 */

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// VFS operation result
///
/// # Must Use
/// VFS operations can fail and must be handled to keep the cache consistent
#[must_use = "VFS operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors with structured, type-safe error handling
///
/// Three families share this enum:
/// - type mismatches (`PathNotDirectory`, `NotADirectory`, `NotAFile`)
/// - rename conflicts (`CannotOverwrite*`)
/// - opaque adapter failures (everything else), never interpreted by the cache
///
/// All error variants with context strings expect them to be non-empty.
/// Serialization uses tagged enum pattern for type safety.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    /// A traversal step expected a directory and found a file or nothing
    #[error("path is not a directory: {0}")]
    PathNotDirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("{0} is not a directory")]
    NotADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("{0} is not a file")]
    NotAFile(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("cannot overwrite file with directory: {0}")]
    CannotOverwriteFileWithDirectory(
        #[serde(deserialize_with = "deserialize_nonempty_string")] String,
    ),

    #[error("cannot overwrite directory with file: {0}")]
    CannotOverwriteDirectoryWithFile(
        #[serde(deserialize_with = "deserialize_nonempty_string")] String,
    ),

    #[error("cannot go below root path: {0}")]
    BelowRoot(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not found: {0}")]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Already exists: {0}")]
    AlreadyExists(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Permission denied: {0}")]
    PermissionDenied(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid path: {0}")]
    InvalidPath(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    IoError(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not supported: {0}")]
    NotSupported(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl VfsError {
    /// True for errors raised before any adapter mutation was attempted
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            VfsError::PathNotDirectory(_)
                | VfsError::NotADirectory(_)
                | VfsError::NotAFile(_)
                | VfsError::CannotOverwriteFileWithDirectory(_)
                | VfsError::CannotOverwriteDirectoryWithFile(_)
        )
    }

    /// Map a host I/O error onto the VFS taxonomy
    pub fn from_io(e: std::io::Error, context: impl Into<String>) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::NotFound => VfsError::NotFound(context.into()),
            ErrorKind::PermissionDenied => VfsError::PermissionDenied(context.into()),
            ErrorKind::AlreadyExists => VfsError::AlreadyExists(context.into()),
            _ => VfsError::IoError(format!("{}: {}", context.into(), e)),
        }
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
