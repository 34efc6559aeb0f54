//! Shared runtime context and id generation.
//!
//! [`RuntimeContext`] is an explicit, passable key/value store. Nothing here
//! is global: callers create a context and hand it to whichever reducers
//! need cross-cutting state.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A shared, type-erased key/value store.
#[derive(Default)]
pub struct RuntimeContext {
    values: Mutex<HashMap<String, Box<dyn Any + Send>>>,
}

impl RuntimeContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, displacing any previous value.
    pub fn insert<V: Send + 'static>(&self, key: impl Into<String>, value: V) {
        self.values.lock().insert(key.into(), Box::new(value));
    }

    /// Returns a clone of the value under `key`, if present with type `V`.
    pub fn get<V: Clone + 'static>(&self, key: &str) -> Option<V> {
        self.values
            .lock()
            .get(key)
            .and_then(|value| value.downcast_ref::<V>())
            .cloned()
    }

    /// Removes and returns the value under `key`.
    ///
    /// A value of a different type is left in place.
    pub fn remove<V: 'static>(&self, key: &str) -> Option<V> {
        let mut values = self.values.lock();
        let boxed = values.remove(key)?;
        match boxed.downcast::<V>() {
            Ok(value) => Some(*value),
            Err(boxed) => {
                values.insert(key.to_string(), boxed);
                None
            }
        }
    }

    /// Whether `key` holds a value of any type.
    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }
}

impl fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("len", &self.values.lock().len())
            .finish()
    }
}

const ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length used by [`generate_id`]'s conventional callers.
pub const DEFAULT_ID_LEN: usize = 24;

/// Generates a random alphanumeric id of `len` characters.
///
/// # Panics
///
/// Panics if the operating system entropy source is unavailable.
pub fn generate_id(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    getrandom::fill(&mut bytes).expect("system entropy unavailable");
    bytes
        .iter()
        .map(|byte| ID_CHARSET[usize::from(*byte) % ID_CHARSET.len()] as char)
        .collect()
}
