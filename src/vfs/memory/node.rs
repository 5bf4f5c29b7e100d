/*!
 * Filesystem Node Types
 * Internal representation of files and directories
 */

use super::super::types::Kind;

/// In-memory filesystem node
#[derive(Debug, Clone)]
pub(in crate::vfs) enum Node {
    File { data: String },
    Directory {
        /// Child base-names in insertion order
        children: Vec<String>,
    },
}

impl Node {
    pub fn file(data: impl Into<String>) -> Self {
        Node::File { data: data.into() }
    }

    pub fn directory() -> Self {
        Node::Directory {
            children: Vec::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn kind(&self) -> Kind {
        match self {
            Node::File { .. } => Kind::File,
            Node::Directory { .. } => Kind::Dir,
        }
    }
}
