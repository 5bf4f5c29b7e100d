/*!
 * Reactive Filesystem Configuration
 */

use tracing::warn;

/// Default capacity of the change-event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Tunables shared by the sync and async reactive filesystems
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsConfig {
    /// Buffer size of the change-event broadcast channel (minimum 1)
    pub event_capacity: usize,

    /// Re-read (sync) or refetch (async) a cached cell on every read call
    ///
    /// When false, the first read seeds the cell and later reads return it
    /// untouched; only mutations update it.
    pub revalidate_on_read: bool,
}

impl FsConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            revalidate_on_read: true,
        }
    }

    /// Minimal event buffer for instances nobody watches
    pub fn quiet() -> Self {
        Self {
            event_capacity: 1,
            ..Self::new()
        }
    }

    /// Build configuration from the environment
    ///
    /// Environment variables:
    /// - RVFS_EVENT_CAPACITY: event buffer size (default: 1024)
    /// - RVFS_REVALIDATE_ON_READ: `0`/`false` disables revalidation (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(raw) = std::env::var("RVFS_EVENT_CAPACITY") {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => config.event_capacity = n,
                _ => warn!(value = %raw, "ignoring invalid RVFS_EVENT_CAPACITY"),
            }
        }

        if let Ok(raw) = std::env::var("RVFS_REVALIDATE_ON_READ") {
            match raw.as_str() {
                "1" | "true" => config.revalidate_on_read = true,
                "0" | "false" => config.revalidate_on_read = false,
                _ => warn!(value = %raw, "ignoring invalid RVFS_REVALIDATE_ON_READ"),
            }
        }

        config
    }

    pub fn with_revalidate_on_read(mut self, revalidate: bool) -> Self {
        self.revalidate_on_read = revalidate;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

impl Default for FsConfig {
    fn default() -> Self {
        Self::new()
    }
}
