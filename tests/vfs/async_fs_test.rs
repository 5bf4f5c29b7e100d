/*!
 * Async Reactive Filesystem Tests
 * Resource identity, settle-then-read and invalidation over deferred adapters
 */

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

use reactive_vfs::vfs::{
    create_file_system, Adapter, AsyncAdapter, AsyncReactiveFs, Deferred, FileSystem, FsConfig,
    Kind, MemFS, SyncAdapter, TokioFS, VfsError, VfsResult,
};

/// MemFS whose directory listings take a while to come back
struct SlowListings(MemFS);

#[async_trait]
impl AsyncAdapter for SlowListings {
    async fn get_type(&self, path: &str) -> Option<Kind> {
        self.0.get_type(path)
    }

    async fn read_dir(&self, path: &str) -> VfsResult<Vec<String>> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.0.read_dir(path)
    }

    async fn read_file(&self, path: &str) -> VfsResult<String> {
        self.0.read_file(path)
    }

    async fn write_file(&self, path: &str, data: &str) -> VfsResult<()> {
        self.0.write_file(path, data)
    }

    async fn mkdir(&self, path: &str) -> VfsResult<()> {
        self.0.mkdir(path)
    }

    async fn rm(&self, path: &str) -> VfsResult<()> {
        self.0.rm(path)
    }
}

fn seeded() -> AsyncReactiveFs<Deferred<MemFS>> {
    let adapter = MemFS::from_json(&json!({ "src": { "index.ts": "// test" } })).unwrap();
    AsyncReactiveFs::new(Deferred::new(adapter)).unwrap()
}

#[tokio::test]
async fn test_concrete_scenario() {
    let adapter = MemFS::from_json(&json!({ "src": { "index.ts": "// test" } })).unwrap();
    let fs = match create_file_system(Adapter::r#async(Deferred::new(adapter)), FsConfig::default())
        .unwrap()
    {
        FileSystem::Async(fs) => fs,
        FileSystem::Sync(_) => panic!("expected an async filesystem"),
    };

    let listing = fs.read_dir("src");
    listing.settled().await;
    assert_eq!(listing.get(), vec!["index.ts"]);

    fs.write_file("src/test2.ts", "// data").await.unwrap();
    assert_eq!(listing.get(), vec!["index.ts", "test2.ts"]);

    let content = fs.read_file("src/test2.ts");
    content.settled().await;
    assert_eq!(content.get(), "// data");
}

#[tokio::test]
async fn test_resource_identity_across_writes() {
    let fs = seeded();
    let first = fs.read_file("src/index.ts");
    first.settled().await;

    let second = fs.read_file("src/index.ts");
    assert!(first.ptr_eq(&second));

    fs.write_file("src/index.ts", "// v2").await.unwrap();

    assert!(first.ptr_eq(&fs.read_file("src/index.ts")));
    assert_eq!(first.get(), "// v2");
    assert_eq!(fs.cached_paths().contents, vec!["src/index.ts"]);
}

#[tokio::test]
async fn test_read_your_writes() {
    let fs = seeded();
    fs.write_file("src/a.ts", "a").await.unwrap();

    let content = fs.read_file("src/a.ts");
    content.settled().await;
    assert_eq!(content.get(), "a");
    assert_eq!(content.error(), None);
}

#[tokio::test]
async fn test_invalidation_cascade_on_mkdir() {
    let fs = seeded();
    fs.mkdir("a").await.unwrap();
    let listing = fs.read_dir("a");
    listing.settled().await;

    fs.mkdir("a/b").await.unwrap();

    assert_eq!(listing.get(), vec!["b"]);
    let kind = fs.get_type("a/b");
    kind.settled().await;
    assert_eq!(kind.get(), Some(Kind::Dir));
}

#[tokio::test]
async fn test_recursive_removal() {
    let fs = AsyncReactiveFs::new(Deferred::new(MemFS::new())).unwrap();
    fs.mkdir("a/b/c").await.unwrap();
    fs.write_file("a/b/c/f.txt", "x").await.unwrap();

    let kind = fs.get_type("a/b/c/f.txt");
    kind.settled().await;
    assert_eq!(kind.get(), Some(Kind::File));

    fs.rm("a").await.unwrap();
    assert_eq!(kind.get(), None);

    let again = fs.get_type("a/b/c/f.txt");
    again.settled().await;
    assert_eq!(again.get(), None);
    assert!(!again.ptr_eq(&kind));
}

#[tokio::test]
async fn test_write_errors_reject() {
    let fs = seeded();
    assert_eq!(
        fs.write_file("src", "x").await,
        Err(VfsError::NotAFile("src".into()))
    );
    assert!(matches!(fs.rm("missing").await, Err(VfsError::NotFound(_))));
}

#[tokio::test]
async fn test_concurrent_reads_share_one_resource() {
    let fs = seeded();
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let fs = fs.clone();
            tokio::spawn(async move { fs.read_dir("src") })
        })
        .collect();

    let mut resources = Vec::new();
    for handle in handles {
        resources.push(handle.await.unwrap());
    }
    assert!(resources.iter().all(|r| r.ptr_eq(&resources[0])));
    assert_eq!(fs.cached_paths().listings, vec!["src"]);
}

#[tokio::test]
async fn test_over_tokio_fs() {
    let dir = TempDir::new().unwrap();
    let fs = AsyncReactiveFs::new(TokioFS::new(dir.path())).unwrap();

    fs.mkdir("docs").await.unwrap();
    let listing = fs.read_dir("docs");
    listing.settled().await;
    assert!(listing.get().is_empty());

    fs.write_file("docs/readme.md", "# hi").await.unwrap();
    assert_eq!(listing.get(), vec!["readme.md"]);

    fs.rename("docs/readme.md", "docs/index.md").await.unwrap();
    assert_eq!(listing.get(), vec!["index.md"]);
}

#[tokio::test]
async fn test_dropped_write_still_settles_listing() {
    let adapter = MemFS::from_json(&json!({ "src": { "index.ts": "// test" } })).unwrap();
    let fs = AsyncReactiveFs::new(SlowListings(adapter)).unwrap();
    let listing = fs.read_dir("src");
    listing.settled().await;

    let write = tokio::time::timeout(
        Duration::from_millis(20),
        fs.write_file("src/n.ts", "n"),
    )
    .await;
    assert!(write.is_err());

    tokio::time::timeout(Duration::from_millis(500), listing.settled())
        .await
        .unwrap();
    assert!(!listing.loading());
    assert_eq!(listing.get(), vec!["index.ts", "n.ts"]);
}
