//! Suspendable computation contracts and building blocks.
//!
//! A suspendable computation is an explicit resumable state machine over an
//! entity type `T`: each resumption either yields a [`Proposal`] for a new
//! entity value or completes with a result. The driver feeds the committed
//! entity value back into every resumption, so a computation always observes
//! reconciled state rather than its own raw proposals.
//!
//! Two trait flavors with identical semantics:
//!
//! - [`Coroutine`]: fully synchronous resumption
//! - [`AsyncCoroutine`]: poll-based resumption with await points between steps
//!
//! Most reducers never need a hand-written state machine: [`YieldOnce`]
//! covers the single-yield shape used by the canonical commit reducer and the
//! built-in reducer library, and [`CoroutineExt::and_then`] composes
//! computations by delegation (the inner computation's yields are re-emitted
//! as the outer one's own).

mod and_then;
mod future;
mod immediate;
mod step;
mod sync;
mod yield_once;

pub use and_then::AndThen;
pub use future::AsyncCoroutine;
pub use immediate::Immediate;
pub use step::{Proposal, Step};
pub use sync::{Coroutine, CoroutineExt};
pub use yield_once::{YieldOnce, maybe_yield, yield_once};
