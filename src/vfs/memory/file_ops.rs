/*!
 * File Operations Implementation
 * Read and write of file nodes
 */

use dashmap::mapref::entry::Entry;

use super::super::paths;
use super::super::types::*;
use super::node::Node;
use super::MemFS;

impl MemFS {
    pub(super) fn read_file_impl(&self, path: &str) -> VfsResult<String> {
        let path = paths::normalize(path);

        match self.nodes.get(&path).as_deref() {
            Some(Node::File { data, .. }) => Ok(data.clone()),
            Some(Node::Directory { .. }) => Err(VfsError::NotAFile(display(&path))),
            None => Err(VfsError::NotFound(display(&path))),
        }
    }

    pub(super) fn write_file_impl(&self, path: &str, data: &str) -> VfsResult<()> {
        let path = paths::normalize(path);
        if path.is_empty() {
            return Err(VfsError::NotAFile("/".to_string()));
        }
        let parent = self.ensure_parent(&path)?;

        let created = match self.nodes.entry(path.clone()) {
            Entry::Occupied(mut occupied) => match occupied.get_mut() {
                Node::File { data: existing, .. } => {
                    *existing = data.to_string();
                    false
                }
                Node::Directory { .. } => return Err(VfsError::NotAFile(path)),
            },
            Entry::Vacant(vacant) => {
                vacant.insert(Node::file(data));
                true
            }
        };

        if created {
            self.add_child(&parent, paths::base_name(&path))?;
        }
        Ok(())
    }
}

/// Root renders as `/` in messages
pub(super) fn display(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
