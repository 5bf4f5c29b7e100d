/*!
 * Tokio Filesystem Backend
 * Host directory adapter over tokio::fs for the async reactive layer
 */

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::local::{guard_for, PathGuard};
use super::paths;
use super::traits::AsyncAdapter;
use super::types::*;

/// Async twin of [`super::LocalFS`]
#[derive(Clone)]
pub struct TokioFS {
    root: PathBuf,
    guard: PathGuard,
}

impl TokioFS {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        Self {
            guard: guard_for(&root),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> VfsResult<PathBuf> {
        (self.guard)(path).map(PathBuf::from)
    }

    async fn kind_of(host: &Path) -> Option<Kind> {
        let md = fs::metadata(host).await.ok()?;
        Some(if md.is_dir() { Kind::Dir } else { Kind::File })
    }
}

impl fmt::Debug for TokioFS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioFS").field("root", &self.root).finish()
    }
}

#[async_trait]
impl AsyncAdapter for TokioFS {
    async fn get_type(&self, path: &str) -> Option<Kind> {
        let host = self.resolve(path).ok()?;
        Self::kind_of(&host).await
    }

    async fn read_dir(&self, path: &str) -> VfsResult<Vec<String>> {
        let host = self.resolve(path)?;
        match Self::kind_of(&host).await {
            Some(Kind::Dir) => {}
            Some(Kind::File) => return Err(VfsError::NotADirectory(path.to_string())),
            None => return Err(VfsError::PathNotDirectory(path.to_string())),
        }

        let mut entries = fs::read_dir(&host)
            .await
            .map_err(|e| VfsError::from_io(e, path))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| VfsError::from_io(e, path))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn read_file(&self, path: &str) -> VfsResult<String> {
        let host = self.resolve(path)?;
        if let Some(Kind::Dir) = Self::kind_of(&host).await {
            return Err(VfsError::NotAFile(path.to_string()));
        }
        fs::read_to_string(&host)
            .await
            .map_err(|e| VfsError::from_io(e, path))
    }

    async fn write_file(&self, path: &str, data: &str) -> VfsResult<()> {
        let host = self.resolve(path)?;
        if let Some(Kind::Dir) = Self::kind_of(&host).await {
            return Err(VfsError::NotAFile(path.to_string()));
        }
        fs::write(&host, data)
            .await
            .map_err(|e| VfsError::from_io(e, path))
    }

    async fn mkdir(&self, path: &str) -> VfsResult<()> {
        let host = self.resolve(path)?;
        fs::create_dir_all(&host)
            .await
            .map_err(|e| VfsError::from_io(e, path))
    }

    async fn rm(&self, path: &str) -> VfsResult<()> {
        let host = self.resolve(path)?;
        if host == self.resolve(paths::ROOT)? {
            return Err(VfsError::InvalidPath("the root cannot be removed".to_string()));
        }
        match Self::kind_of(&host).await {
            Some(Kind::Dir) => fs::remove_dir_all(&host).await,
            Some(Kind::File) => fs::remove_file(&host).await,
            None => return Err(VfsError::NotFound(path.to_string())),
        }
        .map_err(|e| VfsError::from_io(e, path))
    }

    fn supports_rename(&self) -> bool {
        true
    }

    async fn rename(&self, previous: &str, next: &str) -> VfsResult<()> {
        let from = self.resolve(previous)?;
        let to = self.resolve(next)?;
        if fs::metadata(&from).await.map(|m| m.is_dir()).unwrap_or(false)
            && fs::metadata(&to).await.map(|m| m.is_dir()).unwrap_or(false)
        {
            fs::remove_dir_all(&to)
                .await
                .map_err(|e| VfsError::from_io(e, next))?;
        }
        fs::rename(&from, &to)
            .await
            .map_err(|e| VfsError::from_io(e, previous))
    }
}
