//! The asynchronous suspendable computation trait.
//!
//! Semantics are identical to [`Coroutine`](super::Coroutine); the only
//! difference is that a resumption step may be `Pending` while the
//! computation waits for an external asynchronous event. Suspension happens
//! only at yield and await boundaries — the driver itself never suspends
//! independently.

use super::step::Step;
use std::ops::DerefMut;
use std::pin::Pin;
use std::task::{Context, Poll};

/// An asynchronous, single-use, resumable computation over an entity type `T`.
///
/// `poll_resume` attempts to advance the computation to its next suspension
/// point. While a step waits on an external event it returns `Poll::Pending`
/// and must arrange a wakeup through `cx`, exactly like a `Future`.
///
/// The `entity` argument is the driver's *current* tracked value at each poll.
/// A step that spans several polls may observe different values across them;
/// the value that matters is the one seen by the poll that actually advances
/// the computation. This is deliberate: it surfaces transitions committed by
/// interleaved work between a yield and the next resumption.
pub trait AsyncCoroutine<T> {
    /// The terminal result type, distinct from the entity type.
    type Return;

    /// The failure type. Infallible computations use [`std::convert::Infallible`].
    type Error;

    /// Attempts to advance the computation by one step.
    fn poll_resume(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        entity: &T,
    ) -> Poll<Result<Step<T, Self::Return>, Self::Error>>;
}

impl<T, P> AsyncCoroutine<T> for Pin<P>
where
    P: DerefMut + Unpin,
    P::Target: AsyncCoroutine<T>,
{
    type Return = <P::Target as AsyncCoroutine<T>>::Return;
    type Error = <P::Target as AsyncCoroutine<T>>::Error;

    fn poll_resume(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        entity: &T,
    ) -> Poll<Result<Step<T, Self::Return>, Self::Error>> {
        self.get_mut().as_mut().poll_resume(cx, entity)
    }
}

impl<T, C: AsyncCoroutine<T> + Unpin + ?Sized> AsyncCoroutine<T> for Box<C> {
    type Return = C::Return;
    type Error = C::Error;

    fn poll_resume(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        entity: &T,
    ) -> Poll<Result<Step<T, Self::Return>, Self::Error>> {
        Pin::new(&mut **self).poll_resume(cx, entity)
    }
}

impl<T, C: AsyncCoroutine<T> + Unpin + ?Sized> AsyncCoroutine<T> for &mut C {
    type Return = C::Return;
    type Error = C::Error;

    fn poll_resume(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        entity: &T,
    ) -> Poll<Result<Step<T, Self::Return>, Self::Error>> {
        Pin::new(&mut **self).poll_resume(cx, entity)
    }
}
