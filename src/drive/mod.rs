//! The entity iterator: drives a suspendable computation to completion.
//!
//! [`drive`] handles synchronous computations and returns the plain
//! `(entity, result)` pair; [`drive_async`] handles asynchronous ones and
//! returns [`DriveFuture`], the deferred pair. The two have identical
//! semantics — the split is resolved at compile time by which trait the
//! computation implements, never by runtime capability probing.
//!
//! Both drivers accept a [`DriveOptions`] hook bundle. The commit
//! reconciliation hook of the binding layer is installed as `on_yield`; used
//! standalone, the drivers simply track the last accepted proposal.

mod future;
mod options;
mod sync;

pub use future::{DriveFuture, drive_async};
pub use options::{DriveOptions, ReturnHook, SyncHook, YieldHook};
pub use sync::drive;
