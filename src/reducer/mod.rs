//! Reducer classification and the commit contract.
//!
//! A reducer either finishes in one step ([`ReducerOutcome::Immediate`]) or
//! hands back a suspendable computation ([`ReducerOutcome::Suspend`]) for the
//! entity iterator to drive. The distinction is carried in the type, never
//! probed at runtime.
//!
//! [`EntityUseCase`] is the contract every domain implements to participate
//! in reconciliation: one canonical `set_entity` commit reducer per domain,
//! applied to every yielded proposal.

use crate::coroutine::Coroutine;
use std::convert::Infallible;

/// What a reducer produced when invoked.
#[derive(Debug)]
pub enum ReducerOutcome<V, C> {
    /// A plain value; no iteration is needed.
    Immediate(V),
    /// A suspendable computation to be driven to completion.
    Suspend(C),
}

impl<V, C> ReducerOutcome<V, C> {
    /// `true` for [`ReducerOutcome::Immediate`].
    pub fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate(_))
    }

    /// `true` for [`ReducerOutcome::Suspend`].
    pub fn is_suspend(&self) -> bool {
        matches!(self, Self::Suspend(_))
    }
}

/// A domain's canonical commit surface.
///
/// `set_entity` receives the current entity and a settable input and returns
/// a computation that yields the reconciled entity at most once, then
/// completes with it. An input that reconciles to a value equal to the
/// current entity must yield nothing.
///
/// `Settable: From<T>` lets the binding layer route a raw proposed entity
/// through the same reconciliation path as an explicit commit call.
pub trait EntityUseCase<T> {
    /// Input accepted by the commit reducer.
    type Settable: From<T>;
    /// The commit computation. Infallible: reconciliation itself never
    /// rejects, it only reshapes.
    type Commit: Coroutine<T, Return = T, Error = Infallible>;

    /// Builds the commit computation for `settable` against `entity`.
    fn set_entity(&self, entity: T, settable: Self::Settable) -> Self::Commit;
}

impl<T, U: EntityUseCase<T>> EntityUseCase<T> for &U {
    type Settable = U::Settable;
    type Commit = U::Commit;

    fn set_entity(&self, entity: T, settable: Self::Settable) -> Self::Commit {
        (**self).set_entity(entity, settable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coroutine::{Proposal, Step, YieldOnce, maybe_yield};

    fn init_test(name: &str) {
        crate::test_logging::init_test_logging();
        crate::test_phase!(name);
    }

    struct Counter;

    impl EntityUseCase<i32> for Counter {
        type Settable = i32;
        type Commit = YieldOnce<i32, fn(i32) -> i32>;

        fn set_entity(&self, entity: i32, settable: i32) -> Self::Commit {
            let changed = settable != entity;
            maybe_yield(changed.then_some(Proposal::Value(settable)), std::convert::identity)
        }
    }

    #[test]
    fn changed_input_yields_once() {
        init_test("changed_input_yields_once");
        let mut commit = Counter.set_entity(1, 2);
        let step = commit.resume(1).unwrap();
        let yielded = matches!(step, Step::Yield(_));
        crate::assert_with_log!(yielded, "first step yields", true, yielded);
        let step = commit.resume(2).unwrap();
        let done = matches!(step, Step::Complete(2));
        crate::assert_with_log!(done, "completes with entity", true, done);
        crate::test_complete!("changed_input_yields_once");
    }

    #[test]
    fn unchanged_input_yields_nothing() {
        init_test("unchanged_input_yields_nothing");
        let mut commit = Counter.set_entity(3, 3);
        let step = commit.resume(3).unwrap();
        let done = matches!(step, Step::Complete(3));
        crate::assert_with_log!(done, "completes immediately", true, done);
        crate::test_complete!("unchanged_input_yields_nothing");
    }

    #[test]
    fn outcome_classification() {
        init_test("outcome_classification");
        let immediate: ReducerOutcome<i32, YieldOnce<i32, fn(i32) -> i32>> =
            ReducerOutcome::Immediate(7);
        crate::assert_with_log!(immediate.is_immediate(), "immediate", true, immediate.is_immediate());
        let suspend: ReducerOutcome<i32, _> = ReducerOutcome::Suspend(maybe_yield(
            Some(Proposal::Value(1)),
            std::convert::identity as fn(i32) -> i32,
        ));
        crate::assert_with_log!(suspend.is_suspend(), "suspend", true, suspend.is_suspend());
        crate::test_complete!("outcome_classification");
    }
}
