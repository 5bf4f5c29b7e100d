/*!
 * Signal - Synchronous Observable Cell
 * Always-notify semantics: every write reaches every subscriber
 */

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct SignalInner<T> {
    value: RwLock<T>,
    version: AtomicU64,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_subscriber: AtomicU64,
}

/// Shared observable value
///
/// Cloning a `Signal` clones the handle, not the value: every clone observes
/// and writes the same cell. There is no equality short-circuit, so writing
/// an identical value still notifies.
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.read())
            .field("version", &self.inner.version.load(Ordering::Acquire))
            .finish()
    }
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                value: RwLock::new(value),
                version: AtomicU64::new(0),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber: AtomicU64::new(0),
            }),
        }
    }

    /// Clone out the current value
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Borrow the current value without cloning
    ///
    /// Do not write to this signal from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    /// Replace the value and notify every subscriber
    pub fn set(&self, value: T) {
        {
            let mut guard = self.inner.value.write();
            *guard = value;
            self.inner.version.fetch_add(1, Ordering::AcqRel);
        }
        self.notify();
    }

    /// Replace the value with one derived from the old value
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.update_if(|old| Some(f(old)));
    }

    /// Conditionally replace the value
    ///
    /// `f` runs under the write lock and returns `None` to leave the cell
    /// untouched. Returns whether a write (and notification) happened.
    pub fn update_if(&self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        {
            let mut guard = self.inner.value.write();
            match f(&guard) {
                Some(next) => {
                    *guard = next;
                    self.inner.version.fetch_add(1, Ordering::AcqRel);
                }
                None => return false,
            }
        }
        self.notify();
        true
    }

    /// Number of writes since creation
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Register a callback invoked with the new value after every write
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .push((id, Arc::new(callback)));

        let weak: Weak<SignalInner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.lock().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// True if both handles point at the same cell
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self) {
        // Snapshot both value and callbacks so no lock is held while user code runs
        let snapshot = self.inner.value.read().clone();
        let callbacks: Vec<Callback<T>> = self
            .inner
            .subscribers
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

/// Handle returned by [`Signal::subscribe`]; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Keep the callback registered for the lifetime of the cell
    pub fn detach(mut self) {
        self.unsubscribe.take();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
