//! Keyed collections.
//!
//! A data list is a `Vec` of records addressed by a stable key. The key
//! contract is the [`Keyed`] trait on the record type itself, so lookups are
//! type-checked instead of going through a runtime field-name string.

use super::entity::{SetEntity, Settable, propose};
use crate::coroutine::{Coroutine, Proposal, Step, YieldOnce, yield_once};
use crate::reducer::EntityUseCase;
use std::convert::Infallible;
use std::mem;

/// Records addressed by a stable key.
pub trait Keyed {
    /// The key type.
    type Key: PartialEq;

    /// This record's key.
    fn key(&self) -> Self::Key;
}

/// Reducer set for keyed collections. Yielded lists replace the current one
/// wholesale.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataListOps;

impl<T> EntityUseCase<Vec<T>> for DataListOps
where
    T: Keyed + Clone + PartialEq,
{
    type Settable = Settable<Vec<T>>;
    type Commit = SetEntity<Vec<T>>;

    fn set_entity(&self, entity: Vec<T>, settable: Settable<Vec<T>>) -> SetEntity<Vec<T>> {
        let candidate = settable.resolve(entity.clone());
        propose(&entity, candidate)
    }
}

/// Non-suspending lookup by key.
pub fn extract_by<'a, T: Keyed>(list: &'a [T], key: &T::Key) -> Option<&'a T> {
    list.iter().find(|item| item.key() == *key)
}

/// Drops every record with `key`, completing with the committed list.
pub fn filter_by<T>(key: T::Key) -> YieldOnce<Vec<T>, fn(Vec<T>) -> Vec<T>>
where
    T: Keyed + Send + 'static,
    T::Key: Send + 'static,
{
    yield_once(
        Proposal::derive(move |mut list: Vec<T>| {
            list.retain(|item| item.key() != key);
            list
        }),
        std::convert::identity,
    )
}

/// Swaps in a record over the one sharing its key, completing with the
/// displaced record.
///
/// Created by [`replace`]. When no record shares the key, the list is left
/// untouched and the computation completes with `None` without yielding.
#[derive(Debug)]
#[must_use = "coroutines do nothing unless driven"]
pub struct Replace<T> {
    state: ReplaceState<T>,
}

#[derive(Debug)]
enum ReplaceState<T> {
    Start(T),
    Yielded(T),
    Done,
}

impl<T: Keyed> Coroutine<Vec<T>> for Replace<T> {
    type Return = Option<T>;
    type Error = Infallible;

    fn resume(&mut self, mut entity: Vec<T>) -> Result<Step<Vec<T>, Option<T>>, Infallible> {
        match mem::replace(&mut self.state, ReplaceState::Done) {
            ReplaceState::Start(item) => {
                let key = item.key();
                match entity.iter().position(|existing| existing.key() == key) {
                    Some(index) => {
                        let displaced = mem::replace(&mut entity[index], item);
                        self.state = ReplaceState::Yielded(displaced);
                        Ok(Step::Yield(Proposal::Value(entity)))
                    }
                    None => Ok(Step::Complete(None)),
                }
            }
            ReplaceState::Yielded(displaced) => Ok(Step::Complete(Some(displaced))),
            ReplaceState::Done => panic!("Replace resumed after completion"),
        }
    }
}

/// Replaces the record sharing `item`'s key.
pub fn replace<T: Keyed>(item: T) -> Replace<T> {
    Replace {
        state: ReplaceState::Start(item),
    }
}
