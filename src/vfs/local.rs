/*!
 * Local Filesystem Backend
 * Wraps std::fs for host filesystem access
 */

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::paths;
use super::traits::SyncAdapter;
use super::types::*;

pub(super) type PathGuard = Arc<dyn Fn(&str) -> VfsResult<String> + Send + Sync>;

/// Build the confinement guard for a host root directory
pub(super) fn guard_for(root: &Path) -> PathGuard {
    Arc::new(paths::limit_path(&root.to_string_lossy()))
}

/// Local filesystem implementation using std::fs
///
/// Every path goes through [`paths::limit_path`] so callers cannot climb
/// out of `root`.
#[derive(Clone)]
pub struct LocalFS {
    root: PathBuf,
    guard: PathGuard,
    readonly: bool,
}

impl LocalFS {
    /// Create new local filesystem rooted at specified path
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        Self {
            guard: guard_for(&root),
            root,
            readonly: false,
        }
    }

    /// Create read-only local filesystem
    pub fn readonly<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            readonly: true,
            ..Self::new(root)
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a VFS path to a host path inside the root
    fn resolve(&self, path: &str) -> VfsResult<PathBuf> {
        (self.guard)(path).map(PathBuf::from)
    }

    fn check_write(&self, path: &str) -> VfsResult<()> {
        if self.readonly {
            return Err(VfsError::PermissionDenied(format!("read-only: {}", path)));
        }
        Ok(())
    }

    fn kind_of(host: &Path) -> Option<Kind> {
        let md = fs::metadata(host).ok()?;
        if md.is_dir() {
            Some(Kind::Dir)
        } else {
            Some(Kind::File)
        }
    }
}

impl fmt::Debug for LocalFS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFS")
            .field("root", &self.root)
            .field("readonly", &self.readonly)
            .finish()
    }
}

impl SyncAdapter for LocalFS {
    fn get_type(&self, path: &str) -> Option<Kind> {
        let host = self.resolve(path).ok()?;
        Self::kind_of(&host)
    }

    fn read_dir(&self, path: &str) -> VfsResult<Vec<String>> {
        let host = self.resolve(path)?;
        match Self::kind_of(&host) {
            Some(Kind::Dir) => {}
            Some(Kind::File) => return Err(VfsError::NotADirectory(path.to_string())),
            None => return Err(VfsError::PathNotDirectory(path.to_string())),
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&host).map_err(|e| VfsError::from_io(e, path))? {
            let entry = entry.map_err(|e| VfsError::from_io(e, path))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn read_file(&self, path: &str) -> VfsResult<String> {
        let host = self.resolve(path)?;
        if host.is_dir() {
            return Err(VfsError::NotAFile(path.to_string()));
        }
        fs::read_to_string(&host).map_err(|e| VfsError::from_io(e, path))
    }

    fn write_file(&self, path: &str, data: &str) -> VfsResult<()> {
        self.check_write(path)?;
        let host = self.resolve(path)?;
        if host.is_dir() {
            return Err(VfsError::NotAFile(path.to_string()));
        }
        fs::write(&host, data).map_err(|e| VfsError::from_io(e, path))
    }

    fn mkdir(&self, path: &str) -> VfsResult<()> {
        self.check_write(path)?;
        let host = self.resolve(path)?;
        fs::create_dir_all(&host).map_err(|e| VfsError::from_io(e, path))
    }

    fn rm(&self, path: &str) -> VfsResult<()> {
        self.check_write(path)?;
        let host = self.resolve(path)?;
        if host == self.resolve(paths::ROOT)? {
            return Err(VfsError::InvalidPath("the root cannot be removed".to_string()));
        }
        match Self::kind_of(&host) {
            Some(Kind::Dir) => fs::remove_dir_all(&host),
            Some(Kind::File) => fs::remove_file(&host),
            None => return Err(VfsError::NotFound(path.to_string())),
        }
        .map_err(|e| VfsError::from_io(e, path))
    }

    fn supports_rename(&self) -> bool {
        true
    }

    fn rename(&self, previous: &str, next: &str) -> VfsResult<()> {
        self.check_write(previous)?;
        let from = self.resolve(previous)?;
        let to = self.resolve(next)?;
        if from.is_dir() && to.is_dir() {
            fs::remove_dir_all(&to).map_err(|e| VfsError::from_io(e, next))?;
        }
        fs::rename(&from, &to).map_err(|e| VfsError::from_io(e, previous))
    }
}
