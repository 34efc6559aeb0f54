//! Record entities with merge semantics.
//!
//! An object entity absorbs partial updates field by field instead of being
//! replaced wholesale, and may carry [`Derived`] fields whose values are
//! recomputed from their inputs on every new instance, so computed views
//! keep tracking the merged state across commits.

use super::entity::{SetEntity, propose};
use crate::reducer::EntityUseCase;
use std::fmt;

/// Entities that absorb partial updates.
///
/// `merge` builds the next instance from the current one and a patch.
/// Untouched fields carry over; [`Derived`] fields are re-applied against
/// the merged inputs.
pub trait Merge: Sized {
    /// The partial-update shape, typically an all-`Option` mirror of the
    /// entity's plain fields.
    type Patch: Send;

    /// Builds the merged instance.
    fn merge(&self, patch: Self::Patch) -> Self;
}

/// A computed field: a derivation rule plus its cached value.
///
/// The rule travels with the value, so `merge` implementations can re-apply
/// it to the merged inputs via [`reapply`](Derived::reapply). Equality looks
/// at the value alone.
#[derive(Clone, Copy)]
pub struct Derived<F, V> {
    rule: F,
    value: V,
}

impl<F, V> Derived<F, V> {
    /// Creates the field by applying `rule` to `input`.
    pub fn new<A: ?Sized>(rule: F, input: &A) -> Self
    where
        F: Fn(&A) -> V,
    {
        let value = rule(input);
        Self { rule, value }
    }

    /// The cached value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Re-applies the rule to a fresh `input`.
    pub fn reapply<A: ?Sized>(&self, input: &A) -> Self
    where
        F: Fn(&A) -> V + Clone,
    {
        Self {
            rule: self.rule.clone(),
            value: (self.rule)(input),
        }
    }
}

impl<F, V: PartialEq> PartialEq for Derived<F, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<F, V: fmt::Debug> fmt::Debug for Derived<F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Derived").field(&self.value).finish()
    }
}

/// Input to the object commit reducer.
pub enum SettableObject<T: Merge> {
    /// Merge this patch into the current entity.
    Patch(T::Patch),
    /// Replace the entity outright. Yielded whole values are routed here.
    Replace(T),
    /// Replace with the callback's result.
    With(Box<dyn FnOnce(T) -> T + Send>),
}

impl<T: Merge> SettableObject<T> {
    /// Callback form.
    pub fn with(f: impl FnOnce(T) -> T + Send + 'static) -> Self {
        Self::With(Box::new(f))
    }
}

impl<T: Merge> From<T> for SettableObject<T> {
    fn from(entity: T) -> Self {
        Self::Replace(entity)
    }
}

impl<T> fmt::Debug for SettableObject<T>
where
    T: Merge + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch(_) => f.write_str("Patch(..)"),
            Self::Replace(entity) => f.debug_tuple("Replace").field(entity).finish(),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}

/// Reducer set for record entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectOps;

impl<T> EntityUseCase<T> for ObjectOps
where
    T: Merge + Clone + PartialEq,
{
    type Settable = SettableObject<T>;
    type Commit = SetEntity<T>;

    fn set_entity(&self, entity: T, settable: SettableObject<T>) -> SetEntity<T> {
        let candidate = match settable {
            SettableObject::Patch(patch) => entity.merge(patch),
            SettableObject::Replace(next) => next,
            SettableObject::With(f) => f(entity.clone()),
        };
        propose(&entity, candidate)
    }
}
