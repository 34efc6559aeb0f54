//! Entigen: generator-driven entity state engine.
//!
//! # Overview
//!
//! Entigen manages exactly one immutable entity value per bound instance and
//! routes every accepted transition through a single canonical commit reducer.
//! Reducers that need to propose intermediate values are written as
//! *suspendable computations*: explicit resumable state machines that yield
//! entity proposals, get resumed with the committed value, and terminate with
//! a result. The engine drives such a computation step by step, reconciles
//! each yield through the canonical `set_entity` reducer, tracks the outcome
//! in a shared slot, and hands back the final `(entity, result)` pair.
//!
//! # Core Guarantees
//!
//! - **Single canonical writer**: the entity slot changes only through the
//!   canonical commit reducer; every other reducer's yields are re-validated
//!   by it before landing.
//! - **No-op short circuit**: a proposal equal to the current value produces
//!   no yield, no commit, and no notification.
//! - **Strict ordering**: yields are reconciled in emission order; each is
//!   fully committed before the computation resumes.
//! - **Sync/async duality**: the synchronous and asynchronous drivers have
//!   identical semantics; a computation with no await points returns a plain
//!   pair, one with await points returns a deferred pair.
//! - **Commit-each-step**: a failure mid-computation propagates unchanged and
//!   leaves the slot at the last successfully committed value.
//!
//! # Module Structure
//!
//! - [`coroutine`]: suspendable computation contract (sync and async) and
//!   building blocks ([`YieldOnce`], delegation via [`CoroutineExt::and_then`])
//! - [`drive`]: the entity iterator — [`drive`](drive::drive) and
//!   [`DriveFuture`] with the [`DriveOptions`] hook bundle
//! - [`slot`]: the shared mutable entity slot with change watchers
//! - [`reducer`]: reducer-set contracts ([`EntityUseCase`], [`ReducerOutcome`])
//! - [`engine`]: commit reconciliation and the binding layer
//!   ([`BoundEngine`], [`UnboundEngine`])
//! - [`usecases`]: built-in reducer sets (plain entity, mergeable records,
//!   arrays, keyed lists, event maps, coded rejections, runtime context)

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod coroutine;
pub mod drive;
pub mod engine;
pub mod reducer;
pub mod slot;
pub mod usecases;

// ── Test-only modules ───────────────────────────────────────────────────
#[cfg(any(test, feature = "test-internals"))]
pub mod test_logging;

// Re-exports for convenient access to core types
pub use coroutine::{
    AndThen, AsyncCoroutine, Coroutine, CoroutineExt, Immediate, Proposal, Step, YieldOnce,
    maybe_yield, yield_once,
};
pub use drive::{DriveFuture, DriveOptions, drive, drive_async};
pub use engine::{
    BoundEngine, Dispatched, EngineOptions, EntityOnly, Generate, PairGenerate, ResultOnly,
    UnboundEngine, bind_stateless, bind_with_entity,
};
pub use reducer::{EntityUseCase, ReducerOutcome};
pub use slot::EntitySlot;
