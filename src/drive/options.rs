//! Hook bundle for the entity iterator.

use std::fmt;

/// Supplies the driver's notion of the current entity value.
///
/// Defaults to the last accepted value. The binding layer installs a hook
/// that reads the shared slot instead, so a resuming computation observes
/// transitions committed by interleaved work.
pub type SyncHook<T> = Box<dyn FnMut() -> T + Send>;

/// Observes and may transform each accepted transition.
///
/// Called with `(proposed, old)`; the returned value is what the driver
/// actually records as the new tracked entity. The commit reconciliation
/// hook lives here.
pub type YieldHook<T> = Box<dyn FnMut(T, &T) -> T + Send>;

/// Observes computation completion with `(&result, &entity)`.
pub type ReturnHook<T, R> = Box<dyn FnMut(&R, &T) + Send>;

/// Optional hooks threaded through one drive.
#[must_use]
pub struct DriveOptions<T, R> {
    /// Supplies the current value fed into each resumption.
    pub on_sync: Option<SyncHook<T>>,
    /// Intercepts each yielded proposal.
    pub on_yield: Option<YieldHook<T>>,
    /// Observes the terminal result.
    pub on_return: Option<ReturnHook<T, R>>,
}

impl<T, R> DriveOptions<T, R> {
    /// Creates an empty hook bundle.
    pub fn new() -> Self {
        Self {
            on_sync: None,
            on_yield: None,
            on_return: None,
        }
    }

    /// Sets the current-value hook.
    pub fn with_on_sync(mut self, hook: impl FnMut() -> T + Send + 'static) -> Self {
        self.on_sync = Some(Box::new(hook));
        self
    }

    /// Sets the yield interception hook.
    pub fn with_on_yield(mut self, hook: impl FnMut(T, &T) -> T + Send + 'static) -> Self {
        self.on_yield = Some(Box::new(hook));
        self
    }

    /// Sets the completion hook.
    pub fn with_on_return(mut self, hook: impl FnMut(&R, &T) + Send + 'static) -> Self {
        self.on_return = Some(Box::new(hook));
        self
    }
}

impl<T, R> Default for DriveOptions<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> fmt::Debug for DriveOptions<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveOptions")
            .field("on_sync", &self.on_sync.is_some())
            .field("on_yield", &self.on_yield.is_some())
            .field("on_return", &self.on_return.is_some())
            .finish()
    }
}
