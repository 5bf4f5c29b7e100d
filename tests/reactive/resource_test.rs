/*!
 * Resource Tests
 * Loading, error and mutate semantics observed from the outside
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reactive_vfs::reactive::{Resource, ResourceState};
use reactive_vfs::vfs::VfsError;

#[tokio::test]
async fn test_state_snapshot() {
    let resource = Resource::new(0u32, || async { Ok(7) });
    assert_eq!(
        resource.state(),
        ResourceState {
            value: 0,
            loading: false,
            error: None
        }
    );

    resource.refetch().await;
    assert_eq!(resource.state().value, 7);
}

#[tokio::test]
async fn test_mutate_clears_error() {
    let resource: Resource<String> =
        Resource::new(String::new(), || async { Err(VfsError::NotFound("x".into())) });

    resource.refetch().await;
    assert!(resource.error().is_some());

    resource.mutate("local".into());
    assert_eq!(resource.error(), None);
    assert_eq!(resource.get(), "local");
}

#[tokio::test]
async fn test_settled_without_pending_load_returns() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let resource = Resource::new(0usize, move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        async move { Ok(n) }
    });

    resource.settled().await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
