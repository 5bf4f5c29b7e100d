/*!
 * Tree Sync Tests
 * Copying trees between adapters of either flavour
 */

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

use reactive_vfs::vfs::{
    rsync, rsync_async, AsyncAdapter, Deferred, LocalFS, MemFS, SyncAdapter, TokioFS, VfsError,
};

fn project() -> MemFS {
    MemFS::from_json(&json!({
        "src": { "index.ts": "// test", "util": { "math.ts": "export {}" } },
        "README.md": "# demo"
    }))
    .unwrap()
}

#[test]
fn test_memory_to_disk() {
    let dir = TempDir::new().unwrap();
    let disk = LocalFS::new(dir.path());

    rsync(&project(), "/", &disk, "/").unwrap();

    assert_eq!(disk.read_dir("/").unwrap(), vec!["README.md", "src"]);
    assert_eq!(disk.read_file("src/util/math.ts").unwrap(), "export {}");
}

#[test]
fn test_missing_source() {
    let err = rsync(&project(), "nope", &MemFS::new(), "nope").unwrap_err();
    assert_eq!(err, VfsError::NotFound("nope".into()));
}

#[tokio::test]
async fn test_disk_to_memory_async() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
    std::fs::write(dir.path().join("a/b/c.txt"), "deep").unwrap();

    let disk = TokioFS::new(dir.path());
    let memory = Deferred::new(MemFS::new());

    rsync_async(&disk, "a", &memory, "copy").await.unwrap();

    assert_eq!(memory.read_file("copy/b/c.txt").await.unwrap(), "deep");
    assert_eq!(memory.inner().read_dir("copy").unwrap(), vec!["b"]);
}
