/*!
 * Concurrency Tests
 * Many threads hitting one reactive filesystem
 */

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use reactive_vfs::vfs::{MemFS, ReactiveFs};

const THREADS: usize = 8;
const FILES_PER_THREAD: usize = 50;

#[test]
fn test_concurrent_first_reads_create_one_cell() {
    let fs = Arc::new(ReactiveFs::new(MemFS::new()));
    fs.mkdir("shared").unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fs = Arc::clone(&fs);
            thread::spawn(move || fs.read_dir("shared").unwrap())
        })
        .collect();

    let cells: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(cells.iter().all(|c| c.ptr_eq(&cells[0])));
    assert_eq!(fs.cached_paths().listings, vec!["shared"]);
}

#[test]
fn test_concurrent_writes_all_land_in_listing() {
    let fs = Arc::new(ReactiveFs::new(MemFS::new()));
    fs.mkdir("out").unwrap();
    let listing = fs.read_dir("out").unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let fs = Arc::clone(&fs);
            thread::spawn(move || {
                for i in 0..FILES_PER_THREAD {
                    fs.write_file(&format!("out/{}-{}.txt", t, i), "x").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let names: HashSet<String> = listing.get().into_iter().collect();
    assert_eq!(names.len(), THREADS * FILES_PER_THREAD);
    assert_eq!(listing.get().len(), THREADS * FILES_PER_THREAD);
}
