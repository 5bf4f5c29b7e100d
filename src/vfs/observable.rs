/*!
 * Observable VFS - Change Events
 * Broadcast of successful mutations for out-of-band watchers
 */

use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::Kind;

/// Filesystem mutations that can be observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    /// File or directory was created
    Created { path: String, kind: Kind },

    /// File contents were replaced
    Modified { path: String },

    /// File or directory tree was removed
    Deleted { path: String },

    /// File or directory was renamed/moved
    Renamed { from: String, to: String },
}

impl FsEvent {
    /// Get the primary path involved in this event
    pub fn path(&self) -> &str {
        match self {
            FsEvent::Created { path, .. } => path,
            FsEvent::Modified { path } => path,
            FsEvent::Deleted { path } => path,
            FsEvent::Renamed { from, .. } => from,
        }
    }
}

/// Event broadcaster
/// Uses tokio broadcast channel for lock-free MPMC
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: Arc<broadcast::Sender<FsEvent>>,
}

impl EventBroadcaster {
    /// Create new broadcaster with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FsEvent> {
        self.sender.subscribe()
    }

    /// Emit event to all subscribers
    pub fn emit(&self, event: FsEvent) {
        // Ignore errors - if no subscribers, that's fine
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(super::config::DEFAULT_EVENT_CAPACITY)
    }
}
