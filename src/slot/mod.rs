//! Shared entity storage.
//!
//! [`EntitySlot`] is the single authoritative home of an entity value. The
//! binding layer reads it on every resumption and writes it on every
//! reconciled commit; change watchers observe each transition.
//!
//! Cloning a slot clones the handle, not the value. All clones observe the
//! same storage.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::fmt;
use std::mem;
use std::sync::Arc;
use tracing::trace;

type Watcher<T> = Box<dyn FnMut(&T, &T) + Send>;

struct SlotInner<T> {
    value: T,
    watchers: SmallVec<[Watcher<T>; 2]>,
}

/// A shared, watchable cell holding the current entity value.
pub struct EntitySlot<T> {
    inner: Arc<Mutex<SlotInner<T>>>,
}

impl<T> Clone for EntitySlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for EntitySlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("EntitySlot")
            .field("value", &inner.value)
            .field("watchers", &inner.watchers.len())
            .finish()
    }
}

impl<T> EntitySlot<T>
where
    T: Clone + PartialEq,
{
    /// Creates a slot seeded with `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SlotInner {
                value,
                watchers: SmallVec::new(),
            })),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }

    /// Commits `next` and notifies watchers with `(new, old)`.
    ///
    /// A value equal to the current one is a no-op: no write, no
    /// notification. Watchers run outside the lock, so a watcher may read
    /// or write the slot; writes made during notification win over the
    /// value being announced.
    pub fn set(&self, next: T) {
        let (old, mut watchers) = {
            let mut inner = self.inner.lock();
            if inner.value == next {
                trace!("unchanged entity, commit skipped");
                return;
            }
            let old = mem::replace(&mut inner.value, next.clone());
            (old, mem::take(&mut inner.watchers))
        };
        trace!("entity committed");
        for watcher in &mut watchers {
            watcher(&next, &old);
        }
        let mut inner = self.inner.lock();
        // Watchers registered during notification land behind the originals.
        let added = mem::replace(&mut inner.watchers, watchers);
        inner.watchers.extend(added);
    }

    /// Overwrites the value without notifying watchers.
    ///
    /// Used when a stateless binding is re-entered with a fresh entity: the
    /// storage is recycled, not transitioned.
    pub fn reset(&self, value: T) {
        self.inner.lock().value = value;
    }

    /// Registers a change watcher called with `(new, old)` on every commit.
    pub fn watch(&self, watcher: impl FnMut(&T, &T) + Send + 'static) {
        self.inner.lock().watchers.push(Box::new(watcher));
    }
}
