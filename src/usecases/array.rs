//! List entities.
//!
//! Reducers over `Vec<T>` entities. Each editing reducer yields the edited
//! list once and completes with the operation's natural result: `push` and
//! `unshift` with the new length, `pop` and `shift` with the removed item,
//! `splice` with the removed slice, `fill` and `filter` with the committed
//! list itself. [`extract`] is the non-suspending projection for the
//! engines' fast path.

use super::entity::{SetEntity, Settable, propose};
use crate::coroutine::{Coroutine, Proposal, Step, YieldOnce, yield_once};
use crate::reducer::EntityUseCase;
use std::convert::Infallible;
use std::mem;

/// Reducer set for `Vec` entities. Yielded lists replace the current one
/// wholesale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayOps;

impl<T> EntityUseCase<Vec<T>> for ArrayOps
where
    T: Clone + PartialEq,
{
    type Settable = Settable<Vec<T>>;
    type Commit = SetEntity<Vec<T>>;

    fn set_entity(&self, entity: Vec<T>, settable: Settable<Vec<T>>) -> SetEntity<Vec<T>> {
        let candidate = settable.resolve(entity.clone());
        propose(&entity, candidate)
    }
}

/// Appends `items`, completing with the new length.
pub fn push<T>(items: Vec<T>) -> YieldOnce<Vec<T>, fn(Vec<T>) -> usize>
where
    T: Send + 'static,
{
    yield_once(
        Proposal::derive(move |mut list: Vec<T>| {
            list.extend(items);
            list
        }),
        |committed: Vec<T>| committed.len(),
    )
}

/// Prepends `items`, completing with the new length.
pub fn unshift<T>(items: Vec<T>) -> YieldOnce<Vec<T>, fn(Vec<T>) -> usize>
where
    T: Send + 'static,
{
    yield_once(
        Proposal::derive(move |list: Vec<T>| {
            let mut next = items;
            next.extend(list);
            next
        }),
        |committed: Vec<T>| committed.len(),
    )
}

/// Overwrites every element with `value`, completing with the committed
/// list.
pub fn fill<T>(value: T) -> YieldOnce<Vec<T>, fn(Vec<T>) -> Vec<T>>
where
    T: Clone + Send + 'static,
{
    yield_once(
        Proposal::derive(move |list: Vec<T>| vec![value; list.len()]),
        std::convert::identity,
    )
}

/// Keeps only elements matching `predicate`, completing with the committed
/// list.
pub fn filter<T, P>(predicate: P) -> YieldOnce<Vec<T>, fn(Vec<T>) -> Vec<T>>
where
    T: Send + 'static,
    P: FnMut(&T) -> bool + Send + 'static,
{
    yield_once(
        Proposal::derive(move |mut list: Vec<T>| {
            let mut predicate = predicate;
            list.retain(&mut predicate);
            list
        }),
        std::convert::identity,
    )
}

/// Removes one element, completing with it.
///
/// Created by [`pop`] and [`shift`]. An empty list completes with `None`
/// without yielding.
#[derive(Debug)]
#[must_use = "coroutines do nothing unless driven"]
pub struct Remove<T> {
    pick: fn(&mut Vec<T>) -> Option<T>,
    state: RemoveState<T>,
}

#[derive(Debug)]
enum RemoveState<T> {
    Start,
    Yielded(T),
    Done,
}

impl<T> Coroutine<Vec<T>> for Remove<T> {
    type Return = Option<T>;
    type Error = Infallible;

    fn resume(&mut self, mut entity: Vec<T>) -> Result<Step<Vec<T>, Option<T>>, Infallible> {
        match mem::replace(&mut self.state, RemoveState::Done) {
            RemoveState::Start => match (self.pick)(&mut entity) {
                Some(removed) => {
                    self.state = RemoveState::Yielded(removed);
                    Ok(Step::Yield(Proposal::Value(entity)))
                }
                None => Ok(Step::Complete(None)),
            },
            RemoveState::Yielded(removed) => Ok(Step::Complete(Some(removed))),
            RemoveState::Done => panic!("Remove resumed after completion"),
        }
    }
}

/// Removes the last element, completing with it.
pub fn pop<T>() -> Remove<T> {
    Remove {
        pick: Vec::pop,
        state: RemoveState::Start,
    }
}

/// Removes the first element, completing with it.
pub fn shift<T>() -> Remove<T> {
    Remove {
        pick: |list| {
            if list.is_empty() {
                None
            } else {
                Some(list.remove(0))
            }
        },
        state: RemoveState::Start,
    }
}

/// Replaces a range, completing with the removed slice.
///
/// Created by [`splice`]. Out-of-range positions are clamped to the list
/// bounds.
#[derive(Debug)]
#[must_use = "coroutines do nothing unless driven"]
pub struct Splice<T> {
    state: SpliceState<T>,
}

#[derive(Debug)]
enum SpliceState<T> {
    Start {
        start: usize,
        delete: usize,
        items: Vec<T>,
    },
    Yielded(Vec<T>),
    Done,
}

impl<T> Coroutine<Vec<T>> for Splice<T> {
    type Return = Vec<T>;
    type Error = Infallible;

    fn resume(&mut self, mut entity: Vec<T>) -> Result<Step<Vec<T>, Vec<T>>, Infallible> {
        match mem::replace(&mut self.state, SpliceState::Done) {
            SpliceState::Start {
                start,
                delete,
                items,
            } => {
                let start = start.min(entity.len());
                let end = start.saturating_add(delete).min(entity.len());
                let removed: Vec<T> = entity.splice(start..end, items).collect();
                self.state = SpliceState::Yielded(removed);
                Ok(Step::Yield(Proposal::Value(entity)))
            }
            SpliceState::Yielded(removed) => Ok(Step::Complete(removed)),
            SpliceState::Done => panic!("Splice resumed after completion"),
        }
    }
}

/// Removes `delete` elements at `start`, inserting `items` in their place.
pub fn splice<T>(start: usize, delete: usize, items: Vec<T>) -> Splice<T> {
    Splice {
        state: SpliceState::Start {
            start,
            delete,
            items,
        },
    }
}

/// Non-suspending projection of the list.
pub fn extract<T, R>(list: &[T], project: impl FnOnce(&[T]) -> R) -> R {
    project(list)
}
