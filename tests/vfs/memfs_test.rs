/*!
 * MemFS Tests
 * Adapter-level behaviour of the in-memory store
 */

use pretty_assertions::assert_eq;
use serde_json::json;

use reactive_vfs::vfs::memory::MemFS;
use reactive_vfs::vfs::traits::SyncAdapter;
use reactive_vfs::vfs::types::{Kind, VfsError};

#[test]
fn test_memfs_basic() {
    let fs = MemFS::new();

    fs.write_file("/test.txt", "hello").unwrap();
    assert_eq!(fs.read_file("test.txt").unwrap(), "hello");
    assert_eq!(fs.get_type("/test.txt"), Some(Kind::File));
    assert_eq!(fs.get_type("/missing.txt"), None);

    fs.rm("/test.txt").unwrap();
    assert_eq!(fs.get_type("/test.txt"), None);
}

#[test]
fn test_memfs_directories() {
    let fs = MemFS::new();

    fs.mkdir("/testdir/nested").unwrap();
    fs.write_file("/testdir/file.txt", "content").unwrap();

    assert_eq!(fs.read_dir("/testdir").unwrap(), vec!["nested", "file.txt"]);
    assert_eq!(fs.get_type("testdir/nested"), Some(Kind::Dir));
}

#[test]
fn test_memfs_error_messages() {
    let fs = MemFS::from_json(&json!({ "dir": {}, "file": "x" })).unwrap();

    assert_eq!(
        fs.read_dir("file").unwrap_err().to_string(),
        "file is not a directory"
    );
    assert_eq!(
        fs.read_dir("missing").unwrap_err().to_string(),
        "path is not a directory: missing"
    );
    assert_eq!(fs.read_file("dir").unwrap_err().to_string(), "dir is not a file");
    assert_eq!(
        fs.mkdir("file/sub").unwrap_err(),
        VfsError::PathNotDirectory("file".into())
    );
}

#[test]
fn test_memfs_rename_over_existing_file() {
    let fs = MemFS::from_json(&json!({ "a": "1", "b": "2" })).unwrap();

    fs.rename("a", "b").unwrap();

    assert_eq!(fs.read_file("b").unwrap(), "1");
    assert_eq!(fs.read_dir("/").unwrap(), vec!["b"]);
}
