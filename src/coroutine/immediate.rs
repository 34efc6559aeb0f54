//! Zero-yield computations.

use super::step::Step;
use super::sync::Coroutine;
use std::convert::Infallible;
use std::marker::PhantomData;

/// A computation that completes on its first resumption without yielding.
///
/// Useful as the tail of an [`and_then`](super::CoroutineExt::and_then) chain
/// and as the suspendable-shaped wrapper for a value already in hand. The
/// error parameter exists only to line up with fallible chain partners.
#[derive(Debug)]
#[must_use = "coroutines do nothing unless driven"]
pub struct Immediate<R, E = Infallible> {
    value: Option<R>,
    _error: PhantomData<fn() -> E>,
}

impl<R, E> Immediate<R, E> {
    /// Creates a computation that immediately completes with `value`.
    pub fn done(value: R) -> Self {
        Self {
            value: Some(value),
            _error: PhantomData,
        }
    }
}

impl<T, R, E> Coroutine<T> for Immediate<R, E> {
    type Return = R;
    type Error = E;

    fn resume(&mut self, _entity: T) -> Result<Step<T, R>, E> {
        Ok(Step::Complete(
            self.value.take().expect("Immediate resumed after completion"),
        ))
    }
}
