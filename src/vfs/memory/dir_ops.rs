/*!
 * Directory Operations Implementation
 * Listing, recursive creation, recursive removal and subtree moves
 */

use dashmap::mapref::entry::Entry;

use super::super::paths;
use super::super::types::*;
use super::file_ops::display;
use super::node::Node;
use super::MemFS;

impl MemFS {
    pub(super) fn read_dir_impl(&self, path: &str) -> VfsResult<Vec<String>> {
        let path = paths::normalize(path);

        match self.nodes.get(&path).as_deref() {
            Some(Node::Directory { children, .. }) => Ok(children.clone()),
            Some(Node::File { .. }) => Err(VfsError::NotADirectory(display(&path))),
            None => Err(VfsError::PathNotDirectory(display(&path))),
        }
    }

    /// Create `path` and any missing ancestors; existing directories are fine
    pub(super) fn mkdir_impl(&self, path: &str) -> VfsResult<()> {
        for current in paths::ancestors(path) {
            let created = match self.nodes.entry(current.clone()) {
                Entry::Occupied(occupied) => {
                    if !occupied.get().is_dir() {
                        return Err(VfsError::PathNotDirectory(current));
                    }
                    false
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(Node::directory());
                    true
                }
            };

            if created {
                let parent = paths::normalize(&paths::parent_dir(&current));
                self.add_child(&parent, paths::base_name(&current))?;
            }
        }
        Ok(())
    }

    /// Remove a file or a directory tree
    pub(super) fn rm_impl(&self, path: &str) -> VfsResult<()> {
        let path = paths::normalize(path);
        if path.is_empty() {
            return Err(VfsError::InvalidPath("the root cannot be removed".to_string()));
        }
        if !self.nodes.contains_key(&path) {
            return Err(VfsError::NotFound(path));
        }

        for node_path in self.collect_subtree(&path) {
            self.nodes.remove(&node_path);
        }

        let parent = paths::normalize(&paths::parent_dir(&path));
        self.remove_child(&parent, paths::base_name(&path));
        Ok(())
    }

    /// Move a subtree; an existing destination is replaced
    pub(super) fn rename_impl(&self, previous: &str, next: &str) -> VfsResult<()> {
        let previous = paths::normalize(previous);
        let next = paths::normalize(next);

        if previous == next {
            return Ok(());
        }
        if previous.is_empty() || next.is_empty() {
            return Err(VfsError::InvalidPath("the root cannot be renamed".to_string()));
        }
        if paths::is_descendant(&previous, &next) {
            return Err(VfsError::InvalidPath(format!(
                "cannot move {} into itself",
                previous
            )));
        }
        if paths::is_descendant(&next, &previous) {
            return Err(VfsError::InvalidPath(format!(
                "cannot move {} over its ancestor {}",
                previous, next
            )));
        }
        if !self.nodes.contains_key(&previous) {
            return Err(VfsError::NotFound(previous));
        }
        let next_parent = self.ensure_parent(&next)?;

        if self.nodes.contains_key(&next) {
            self.rm_impl(&next)?;
        }

        // Collect first, then move: no shard lock is held across inserts
        let moved: Vec<(String, Node)> = self
            .collect_subtree(&previous)
            .into_iter()
            .filter_map(|old| self.nodes.remove(&old))
            .collect();

        for (old, node) in moved {
            if let Some(new_path) = paths::rebase(&old, &previous, &next) {
                self.nodes.insert(new_path, node);
            }
        }

        let previous_parent = paths::normalize(&paths::parent_dir(&previous));
        self.remove_child(&previous_parent, paths::base_name(&previous));
        self.add_child(&next_parent, paths::base_name(&next))
    }

    /// `path` and every node below it, parents before children
    fn collect_subtree(&self, path: &str) -> Vec<String> {
        let mut collected = Vec::new();
        let mut to_visit = vec![path.to_string()];

        while let Some(current) = to_visit.pop() {
            let children = match self.nodes.get(&current).as_deref() {
                Some(Node::Directory { children, .. }) => children.clone(),
                _ => Vec::new(),
            };
            for child in children {
                to_visit.push(paths::join(&current, &child));
            }
            collected.push(current);
        }

        collected
    }
}
