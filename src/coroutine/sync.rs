//! The synchronous suspendable computation trait.

use super::and_then::AndThen;
use super::step::Step;

/// A synchronous, single-use, resumable computation over an entity type `T`.
///
/// Each call to [`resume`](Self::resume) advances the computation to its next
/// suspension point. The `entity` argument is the driver's currently tracked
/// value — after a yield has been reconciled, the computation is resumed with
/// the *committed* value, not its own raw proposal, and must not assume the
/// two coincide.
///
/// Implementations are explicit state machines: each state corresponds to one
/// suspension point. Resuming after `Complete` has been returned is a caller
/// bug and panics.
pub trait Coroutine<T> {
    /// The terminal result type, distinct from the entity type.
    type Return;

    /// The failure type. Infallible computations use [`std::convert::Infallible`].
    type Error;

    /// Advances the computation by one step.
    ///
    /// Failures propagate unchanged to the driver; the driver performs no
    /// recovery or rollback.
    fn resume(&mut self, entity: T) -> Result<Step<T, Self::Return>, Self::Error>;
}

impl<T, C: Coroutine<T> + ?Sized> Coroutine<T> for &mut C {
    type Return = C::Return;
    type Error = C::Error;

    fn resume(&mut self, entity: T) -> Result<Step<T, Self::Return>, Self::Error> {
        (**self).resume(entity)
    }
}

impl<T, C: Coroutine<T> + ?Sized> Coroutine<T> for Box<C> {
    type Return = C::Return;
    type Error = C::Error;

    fn resume(&mut self, entity: T) -> Result<Step<T, Self::Return>, Self::Error> {
        (**self).resume(entity)
    }
}

/// Combinator extensions for [`Coroutine`].
pub trait CoroutineExt<T>: Coroutine<T> + Sized {
    /// Delegates to `self` as a sub-computation, then continues with the
    /// computation produced by `f` from its result.
    ///
    /// The sub-computation's yields are re-emitted as the combined
    /// computation's own yields; its return value becomes a local input to
    /// `f` rather than the combined computation's termination. This is the
    /// explicit-state-machine equivalent of generator delegation.
    fn and_then<F, N>(self, f: F) -> AndThen<Self, F, N>
    where
        F: FnOnce(Self::Return) -> N,
        N: Coroutine<T, Error = Self::Error>,
    {
        AndThen::new(self, f)
    }
}

impl<T, C: Coroutine<T>> CoroutineExt<T> for C {}
