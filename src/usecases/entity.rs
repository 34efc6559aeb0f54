//! Wholesale value replacement.
//!
//! The base domain: the canonical commit replaces the entity outright, with
//! the no-op short circuit every other domain inherits through
//! [`propose`]. An input that resolves to a value equal to the current
//! entity produces a commit computation with zero yields, so nothing is
//! written and no watcher fires.

use crate::coroutine::{Proposal, YieldOnce, maybe_yield};
use crate::reducer::EntityUseCase;
use std::fmt;

/// The commit computation shared by the built-in domains: at most one
/// yield, completing with the committed entity.
pub type SetEntity<T> = YieldOnce<T, fn(T) -> T>;

/// Builds the commit computation for `candidate` against `entity`.
///
/// Equal values yield nothing.
pub(crate) fn propose<T: PartialEq>(entity: &T, candidate: T) -> SetEntity<T> {
    let changed = candidate != *entity;
    maybe_yield(changed.then_some(Proposal::Value(candidate)), std::convert::identity)
}

/// Input to the base commit reducer: a replacement value, or a callback
/// applied to the current entity.
pub enum Settable<T> {
    /// Replace with this value.
    Value(T),
    /// Replace with the callback's result.
    With(Box<dyn FnOnce(T) -> T + Send>),
}

impl<T> Settable<T> {
    /// Callback form.
    pub fn with(f: impl FnOnce(T) -> T + Send + 'static) -> Self {
        Self::With(Box::new(f))
    }

    /// Resolves to the candidate value.
    pub fn resolve(self, current: T) -> T {
        match self {
            Self::Value(value) => value,
            Self::With(f) => f(current),
        }
    }
}

impl<T> From<T> for Settable<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Settable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}

/// The base reducer set: plain values, replaced wholesale.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityOps;

impl<T> EntityUseCase<T> for EntityOps
where
    T: Clone + PartialEq,
{
    type Settable = Settable<T>;
    type Commit = SetEntity<T>;

    fn set_entity(&self, entity: T, settable: Settable<T>) -> SetEntity<T> {
        let candidate = settable.resolve(entity.clone());
        propose(&entity, candidate)
    }
}
