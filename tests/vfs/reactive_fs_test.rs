/*!
 * Sync Reactive Filesystem Tests
 * Cache identity, read-your-writes and invalidation over MemFS
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

use reactive_vfs::vfs::{
    create_file_system, Adapter, FileSystem, FsConfig, Kind, MemFS, ReactiveFs, VfsError,
};

fn seeded() -> ReactiveFs<MemFS> {
    ReactiveFs::new(MemFS::from_json(&json!({ "src": { "index.ts": "// test" } })).unwrap())
}

#[test]
fn test_concrete_scenario() {
    let adapter = MemFS::from_json(&json!({ "src": { "index.ts": "// test" } })).unwrap();
    let fs = match create_file_system(Adapter::sync(adapter), FsConfig::default()).unwrap() {
        FileSystem::Sync(fs) => fs,
        FileSystem::Async(_) => panic!("expected a sync filesystem"),
    };

    let listing = fs.read_dir("src").unwrap();
    assert_eq!(listing.get(), vec!["index.ts"]);

    fs.write_file("src/test2.ts", "// data").unwrap();

    assert_eq!(listing.get(), vec!["index.ts", "test2.ts"]);
    assert_eq!(fs.read_dir("src").unwrap().get(), vec!["index.ts", "test2.ts"]);
    assert_eq!(fs.read_file("src/test2.ts").unwrap().get(), "// data");
}

#[test]
fn test_read_your_writes() {
    let fs = seeded();
    for (i, path) in ["a.txt", "src/b.txt", "src/index.ts"].iter().enumerate() {
        let data = format!("value {}", i);
        fs.write_file(path, &data).unwrap();
        assert_eq!(fs.read_file(path).unwrap().get(), data);
    }
}

#[test]
fn test_cache_singleton_per_path() {
    let fs = seeded();

    assert!(fs.read_dir("src").unwrap().ptr_eq(&fs.read_dir("src").unwrap()));
    assert!(fs.get_type("src").ptr_eq(&fs.get_type("/src")));
    assert!(fs
        .read_file("src/index.ts")
        .unwrap()
        .ptr_eq(&fs.read_file("src/index.ts").unwrap()));

    let cached = fs.cached_paths();
    assert_eq!(cached.listings, vec!["src"]);
    assert_eq!(cached.types, vec!["src"]);
    assert_eq!(cached.contents, vec!["src/index.ts"]);
}

#[test]
fn test_invalidation_cascade_on_mkdir() {
    let fs = ReactiveFs::new(MemFS::new());
    fs.mkdir("a").unwrap();
    let listing = fs.read_dir("a").unwrap();

    fs.mkdir("a/b").unwrap();

    assert!(listing.get().contains(&"b".to_string()));
    assert_eq!(fs.read_dir("a").unwrap().get(), vec!["b"]);
    assert_eq!(fs.get_type("a/b").get(), Some(Kind::Dir));
}

#[test]
fn test_mkdir_without_cached_parent_is_lazy() {
    let fs = ReactiveFs::new(MemFS::new());
    fs.mkdir("x/y/z").unwrap();

    assert!(fs.cached_paths().is_empty());
    assert_eq!(fs.read_dir("x/y").unwrap().get(), vec!["z"]);
}

#[test]
fn test_recursive_removal() {
    let fs = ReactiveFs::new(MemFS::new());
    fs.mkdir("a/b/c").unwrap();
    fs.write_file("a/b/c/f.txt", "x").unwrap();
    let kind = fs.get_type("a/b/c/f.txt");
    let root = fs.read_dir("/").unwrap();
    assert_eq!(kind.get(), Some(Kind::File));

    fs.rm("a").unwrap();

    assert_eq!(kind.get(), None);
    assert_eq!(fs.get_type("a/b/c/f.txt").get(), None);
    assert!(root.get().is_empty());
}

#[test]
fn test_cells_notify_subscribers() {
    let fs = seeded();
    let listing = fs.read_dir("src").unwrap();
    let history = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&history);
    let sub = listing.subscribe(move |names: &Vec<String>| sink.lock().push(names.len()));

    fs.write_file("src/a.ts", "a").unwrap();
    fs.mkdir("src/lib").unwrap();
    fs.rm("src/index.ts").unwrap();
    drop(sub);
    fs.write_file("src/b.ts", "b").unwrap();

    assert_eq!(history.lock().as_slice(), &[2, 3, 2]);
    assert_eq!(listing.get(), vec!["a.ts", "lib", "b.ts"]);
}

#[test]
fn test_read_errors_propagate() {
    let fs = seeded();

    assert_eq!(
        fs.read_dir("src/index.ts").unwrap_err(),
        VfsError::NotADirectory("src/index.ts".into())
    );
    assert_eq!(
        fs.read_file("src").unwrap_err(),
        VfsError::NotAFile("src".into())
    );
    assert!(matches!(fs.rm("nope"), Err(VfsError::NotFound(_))));
}

#[test]
fn test_write_error_leaves_cache_untouched() {
    let fs = seeded();
    let listing = fs.read_dir("src").unwrap();

    assert!(fs.write_file("missing/file.ts", "x").is_err());
    assert!(fs.write_file("src", "x").is_err());

    assert_eq!(listing.get(), vec!["index.ts"]);
    assert_eq!(listing.version(), 0);
}

#[test]
fn test_instances_do_not_share_caches() {
    let adapter = MemFS::new();
    let first = ReactiveFs::new(adapter.clone());
    let second = ReactiveFs::new(adapter);

    let a = first.read_dir("/").unwrap();
    second.write_file("x", "1").unwrap();

    // Only a re-read through `first` observes a write made through `second`
    assert!(a.get().is_empty());
    assert_eq!(first.read_dir("/").unwrap().get(), vec!["x"]);
}
