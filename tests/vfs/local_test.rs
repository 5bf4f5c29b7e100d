/*!
 * LocalFS Tests
 * Host directory adapter behind the reactive layer
 */

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use reactive_vfs::vfs::{Kind, LocalFS, ReactiveFs, SyncAdapter, VfsError};

#[test]
fn test_reactive_over_host_directory() {
    let dir = TempDir::new().unwrap();
    let fs = ReactiveFs::new(LocalFS::new(dir.path()));

    fs.mkdir("src").unwrap();
    let listing = fs.read_dir("src").unwrap();
    fs.write_file("src/b.ts", "b").unwrap();
    fs.write_file("src/a.ts", "a").unwrap();

    // Cells are updated in mutation order, the adapter lists sorted
    assert_eq!(listing.get(), vec!["b.ts", "a.ts"]);
    assert_eq!(fs.read_dir("src").unwrap().get(), vec!["a.ts", "b.ts"]);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("src/a.ts")).unwrap(),
        "a"
    );
}

#[test]
fn test_below_root_is_rejected() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("jail");
    std::fs::create_dir(&nested).unwrap();
    let fs = LocalFS::new(&nested);

    let depth = nested.components().count();
    let escape = "../".repeat(depth + 1);
    let err = fs.read_file(&format!("{}etc/passwd", escape)).unwrap_err();
    assert!(matches!(err, VfsError::BelowRoot(_)));
    assert!(err.to_string().starts_with("cannot go below root path"));
}

#[test]
fn test_get_type_maps_errors_to_none() {
    let dir = TempDir::new().unwrap();
    let fs = LocalFS::new(dir.path());

    assert_eq!(fs.get_type("missing/deeper"), None);
    assert_eq!(fs.get_type("/"), Some(Kind::Dir));
}
