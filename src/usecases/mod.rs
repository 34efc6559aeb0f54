//! Built-in reducer sets.
//!
//! Each submodule is a self-contained domain: an entity shape, an
//! [`EntityUseCase`](crate::reducer::EntityUseCase) implementation for its
//! canonical commit, and a library of reducers expressed as suspendable
//! computations for the engine to drive.
//!
//! * [`entity`] — wholesale value replacement, the base everything else
//!   leans on.
//! * [`object`] — record entities with merge semantics and computed fields.
//! * [`array`] — `Vec` entities with list-editing reducers.
//! * [`data_list`] — keyed collections.
//! * [`event`] — listener bookkeeping with an async one-shot wait.
//! * [`rejection`] — coded failure values for fallible reducers.
//! * [`runtime`] — shared context and id generation.

pub mod array;
pub mod data_list;
pub mod entity;
pub mod event;
pub mod object;
pub mod rejection;
pub mod runtime;
