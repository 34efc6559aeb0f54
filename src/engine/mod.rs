//! The binding layer.
//!
//! An engine pairs a domain ([`EntityUseCase`](crate::reducer::EntityUseCase))
//! with the entity iterator and routes every yielded proposal through the
//! domain's canonical commit reducer before it reaches shared storage.
//!
//! Two bindings exist, split at the constructor rather than probed per call:
//!
//! * [`bind_with_entity`] creates a [`BoundEngine`] that owns an
//!   [`EntitySlot`](crate::slot::EntitySlot) seeded once; successive
//!   dispatches accumulate on it.
//! * [`bind_stateless`] creates an [`UnboundEngine`] whose calls each take
//!   the entity as a leading argument; storage is recycled between calls and
//!   immediate reducers never touch it.
//!
//! The [`Generate`] hook shapes what callers get back from the suspending
//! entry points: the `(entity, result)` pair by default, or either half
//! alone. The immediate fast path bypasses it and passes the raw reducer
//! result through untouched.

mod bound;
mod options;
mod reconcile;
mod unbound;

pub use bound::{BoundEngine, bind_with_entity};
pub use options::{ChangeHook, EngineOptions, EntityOnly, Generate, PairGenerate, ResultOnly};
pub use unbound::{UnboundEngine, bind_stateless};

/// How an invocation of a classified reducer was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched<R, O> {
    /// The reducer finished immediately; its result is passed through
    /// untouched and shared storage was not involved.
    Raw(R),
    /// The reducer suspended, was driven through reconciliation, and its
    /// output went through the generate hook.
    Generated(O),
}

impl<O> Dispatched<O, O> {
    /// Unwraps the output, discarding how it was produced.
    pub fn into_inner(self) -> O {
        match self {
            Self::Raw(output) | Self::Generated(output) => output,
        }
    }
}
