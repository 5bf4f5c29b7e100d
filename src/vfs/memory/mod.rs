/*!
 * In-Memory Filesystem Backend
 * Volatile virtual store for tests, demos and sandboxed trees
 */

mod dir_ops;
mod file_ops;
mod node;

use ahash::RandomState;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

use super::paths;
use super::traits::SyncAdapter;
use super::types::*;
use node::Node;

/// In-memory filesystem implementation
///
/// Clones share the same store, so a test can hand one clone to a reactive
/// filesystem and inspect the other. The rename capability is per handle.
#[derive(Debug, Clone)]
pub struct MemFS {
    pub(super) nodes: Arc<DashMap<String, Node, RandomState>>,
    pub(super) native_rename: bool,
}

impl MemFS {
    /// Create new in-memory filesystem holding only the root directory
    pub fn new() -> Self {
        let nodes = DashMap::with_hasher(RandomState::new());
        nodes.insert(paths::ROOT.to_string(), Node::directory());

        Self {
            nodes: Arc::new(nodes),
            native_rename: true,
        }
    }

    /// Seed a filesystem from a JSON tree
    ///
    /// Objects become directories and strings become files:
    /// `{"src": {"index.ts": "// test"}}`.
    pub fn from_json(tree: &Value) -> VfsResult<Self> {
        let fs = Self::new();
        match tree {
            Value::Object(_) => fs.seed(paths::ROOT, tree)?,
            _ => {
                return Err(VfsError::InvalidArgument(
                    "seed tree must be a JSON object".to_string(),
                ))
            }
        }
        Ok(fs)
    }

    /// Enable or disable the native `rename` capability
    ///
    /// With rename disabled the reactive layer falls back to copy-then-delete.
    pub fn with_rename(mut self, enabled: bool) -> Self {
        self.native_rename = enabled;
        self
    }

    /// Number of stored nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn seed(&self, path: &str, tree: &Value) -> VfsResult<()> {
        match tree {
            Value::Object(children) => {
                self.mkdir_impl(path)?;
                for (name, child) in children {
                    self.seed(&paths::join(path, name), child)?;
                }
                Ok(())
            }
            Value::String(data) => self.write_file_impl(path, data),
            other => Err(VfsError::InvalidArgument(format!(
                "unsupported seed value at {}: {}",
                path, other
            ))),
        }
    }

    /// Add child to parent directory (no duplicates)
    pub(super) fn add_child(&self, parent_path: &str, child_name: &str) -> VfsResult<()> {
        match self.nodes.get_mut(parent_path) {
            Some(mut node) => match node.value_mut() {
                Node::Directory { children, .. } => {
                    if !children.iter().any(|c| c == child_name) {
                        children.push(child_name.to_string());
                    }
                    Ok(())
                }
                Node::File { .. } => Err(VfsError::PathNotDirectory(parent_path.to_string())),
            },
            None => Err(VfsError::PathNotDirectory(parent_path.to_string())),
        }
    }

    /// Remove child from parent directory
    pub(super) fn remove_child(&self, parent_path: &str, child_name: &str) {
        if let Some(mut node) = self.nodes.get_mut(parent_path) {
            if let Node::Directory { children, .. } = node.value_mut() {
                children.retain(|c| c != child_name);
            }
        }
    }

    /// Ensure the parent of `path` exists and is a directory
    pub(super) fn ensure_parent(&self, path: &str) -> VfsResult<String> {
        let parent = paths::normalize(&paths::parent_dir(path));
        match self.nodes.get(&parent).map(|n| n.is_dir()) {
            Some(true) => Ok(parent),
            _ => Err(VfsError::PathNotDirectory(parent)),
        }
    }
}

impl Default for MemFS {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncAdapter for MemFS {
    fn get_type(&self, path: &str) -> Option<Kind> {
        self.nodes.get(&paths::normalize(path)).map(|n| n.kind())
    }

    fn read_dir(&self, path: &str) -> VfsResult<Vec<String>> {
        self.read_dir_impl(path)
    }

    fn read_file(&self, path: &str) -> VfsResult<String> {
        self.read_file_impl(path)
    }

    fn write_file(&self, path: &str, data: &str) -> VfsResult<()> {
        self.write_file_impl(path, data)
    }

    fn mkdir(&self, path: &str) -> VfsResult<()> {
        self.mkdir_impl(path)
    }

    fn rm(&self, path: &str) -> VfsResult<()> {
        self.rm_impl(path)
    }

    fn supports_rename(&self) -> bool {
        self.native_rename
    }

    fn rename(&self, previous: &str, next: &str) -> VfsResult<()> {
        if !self.supports_rename() {
            return Err(VfsError::NotSupported(format!("rename of {}", previous)));
        }
        self.rename_impl(previous, next)
    }
}
