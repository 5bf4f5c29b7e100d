/*!
 * VFS Entry Kind
 * The two kinds of object a storage adapter can hold
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of filesystem object
///
/// Absence is modelled as `Option<Kind>::None` rather than a third variant,
/// so that a type cell holding `None` reads as "nothing at this path".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    File,
    Dir,
}

impl Kind {
    #[inline]
    pub fn is_file(self) -> bool {
        self == Kind::File
    }

    #[inline]
    pub fn is_dir(self) -> bool {
        self == Kind::Dir
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::File => write!(f, "file"),
            Kind::Dir => write!(f, "dir"),
        }
    }
}
