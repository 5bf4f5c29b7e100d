/*!
 * Reactive VFS - Demo Entry Point
 *
 * Mounts a directory (or an in-memory tree when none is given), then logs
 * how cached cells and change events react to a few mutations.
 */

use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use reactive_vfs::{
    create_file_system, init_tracing, Adapter, Deferred, FileSystem, FsConfig, LocalFS, MemFS,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = FsConfig::from_env();
    let adapter = match std::env::args().nth(1) {
        Some(root) => {
            info!(root = %root, "mounting host directory");
            Adapter::sync(LocalFS::new(root))
        }
        None => {
            info!("mounting in-memory tree");
            Adapter::sync(MemFS::from_json(&json!({ "src": { "index.ts": "// test" } }))?)
        }
    };

    match create_file_system(adapter, config.clone())? {
        FileSystem::Sync(fs) => run_sync(&fs)?,
        FileSystem::Async(_) => anyhow::bail!("expected a synchronous filesystem"),
    }

    // Same walkthrough over the deferred wrapper
    let memory = MemFS::from_json(&json!({ "src": { "index.ts": "// test" } }))?;
    if let FileSystem::Async(fs) = create_file_system(Adapter::r#async(Deferred::new(memory)), config)? {
        let listing = fs.read_dir("src");
        listing.settled().await;
        info!(entries = ?listing.get(), "async listing loaded");

        fs.write_file("src/async.ts", "// deferred")
            .await
            .context("async write failed")?;
        info!(entries = ?listing.get(), "async listing after write");
    }

    Ok(())
}

fn run_sync(fs: &reactive_vfs::ReactiveFs) -> Result<()> {
    let mut events = fs.subscribe_events();

    fs.mkdir("src").context("mkdir src")?;
    let listing = fs.read_dir("src")?;
    let seen = Arc::new(parking_lot::Mutex::new(0usize));
    let counter = Arc::clone(&seen);
    let _sub = listing.subscribe(move |names: &Vec<String>| {
        *counter.lock() += 1;
        info!(entries = ?names, "listing changed");
    });

    fs.write_file("src/test2.ts", "// data")
        .context("write src/test2.ts")?;
    let content = fs.read_file("src/test2.ts")?;
    info!(content = %content.get(), "read back");

    fs.rename("src/test2.ts", "src/renamed.ts")?;
    fs.rm("src/renamed.ts")?;

    while let Ok(event) = events.try_recv() {
        info!(?event, "change event");
    }
    info!(notifications = *seen.lock(), "done");
    Ok(())
}
