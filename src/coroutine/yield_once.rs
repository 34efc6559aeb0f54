//! Single-yield computations.
//!
//! `YieldOnce` is the workhorse shape of the built-in reducer library: yield
//! one proposal, then complete with a value computed from the committed
//! entity. The optional-proposal form covers reducers that short-circuit to
//! an immediate completion (the no-op path of the canonical commit reducer,
//! removal of an absent listener, and similar).

use super::step::{Proposal, Step};
use super::sync::Coroutine;
use std::convert::Infallible;
use std::mem;

/// A computation that yields at most one proposal, then completes with
/// `finish(committed)`.
///
/// Created by [`yield_once`] and [`maybe_yield`].
#[derive(Debug)]
#[must_use = "coroutines do nothing unless driven"]
pub struct YieldOnce<T, F> {
    state: State<T, F>,
}

#[derive(Debug)]
enum State<T, F> {
    Start(Option<Proposal<T>>, F),
    Yielded(F),
    Done,
}

/// Creates a computation that yields `proposal` once, then completes with
/// `finish(committed)` where `committed` is the reconciled entity fed back at
/// resumption.
pub fn yield_once<T, R, F>(proposal: impl Into<Proposal<T>>, finish: F) -> YieldOnce<T, F>
where
    F: FnOnce(T) -> R,
{
    YieldOnce {
        state: State::Start(Some(proposal.into()), finish),
    }
}

/// Like [`yield_once`], but with an optional proposal.
///
/// With `None` the computation never suspends: it completes immediately with
/// `finish(current)` where `current` is the entity the driver fed in.
pub fn maybe_yield<T, R, F>(proposal: Option<Proposal<T>>, finish: F) -> YieldOnce<T, F>
where
    F: FnOnce(T) -> R,
{
    YieldOnce {
        state: State::Start(proposal, finish),
    }
}

impl<T, R, F: FnOnce(T) -> R> Coroutine<T> for YieldOnce<T, F> {
    type Return = R;
    type Error = Infallible;

    fn resume(&mut self, entity: T) -> Result<Step<T, R>, Infallible> {
        match mem::replace(&mut self.state, State::Done) {
            State::Start(Some(proposal), finish) => {
                self.state = State::Yielded(finish);
                Ok(Step::Yield(proposal))
            }
            State::Start(None, finish) | State::Yielded(finish) => {
                Ok(Step::Complete(finish(entity)))
            }
            State::Done => panic!("YieldOnce resumed after completion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test(name: &str) {
        crate::test_logging::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn yields_then_finishes_with_committed() {
        init_test("yields_then_finishes_with_committed");
        let mut c = yield_once(10, |committed: i32| committed * 2);

        let step = c.resume(0).unwrap();
        let proposed = match step {
            Step::Yield(p) => p.resolve(0),
            Step::Complete(_) => panic!("expected yield"),
        };
        crate::assert_with_log!(proposed == 10, "proposed", 10, proposed);

        // The driver may commit a different value than proposed.
        let step = c.resume(11).unwrap();
        let result = match step {
            Step::Complete(r) => r,
            Step::Yield(_) => panic!("expected completion"),
        };
        crate::assert_with_log!(result == 22, "result", 22, result);
        crate::test_complete!("yields_then_finishes_with_committed");
    }

    #[test]
    fn no_proposal_completes_immediately() {
        init_test("no_proposal_completes_immediately");
        let mut c = maybe_yield(None, |current: i32| current + 1);
        let step = c.resume(5).unwrap();
        let result = match step {
            Step::Complete(r) => r,
            Step::Yield(_) => panic!("expected completion"),
        };
        crate::assert_with_log!(result == 6, "result", 6, result);
        crate::test_complete!("no_proposal_completes_immediately");
    }

    #[test]
    #[should_panic(expected = "resumed after completion")]
    fn resume_after_completion_panics() {
        let mut c = maybe_yield(None, |current: i32| current);
        let _ = c.resume(1);
        let _ = c.resume(2);
    }
}
