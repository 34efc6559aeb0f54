//! Sub-computation delegation.

use super::step::Step;
use super::sync::Coroutine;
use std::mem;

/// A computation that delegates to an inner computation, then continues with
/// a second one built from the inner result.
///
/// Created by [`CoroutineExt::and_then`](super::CoroutineExt::and_then).
/// The inner computation's yields pass through unchanged; when it completes,
/// the continuation runs within the *same* resumption — exactly as generator
/// delegation continues executing until the next suspension point.
#[derive(Debug)]
#[must_use = "coroutines do nothing unless driven"]
pub struct AndThen<C, F, N> {
    state: State<C, F, N>,
}

#[derive(Debug)]
enum State<C, F, N> {
    First(C, F),
    Second(N),
    Done,
}

impl<C, F, N> AndThen<C, F, N> {
    pub(crate) fn new(inner: C, f: F) -> Self {
        Self {
            state: State::First(inner, f),
        }
    }
}

impl<T, C, F, N> Coroutine<T> for AndThen<C, F, N>
where
    T: Clone,
    C: Coroutine<T>,
    F: FnOnce(C::Return) -> N,
    N: Coroutine<T, Error = C::Error>,
{
    type Return = N::Return;
    type Error = C::Error;

    fn resume(&mut self, entity: T) -> Result<Step<T, N::Return>, Self::Error> {
        loop {
            match mem::replace(&mut self.state, State::Done) {
                State::First(mut inner, f) => match inner.resume(entity.clone())? {
                    Step::Yield(proposal) => {
                        self.state = State::First(inner, f);
                        return Ok(Step::Yield(proposal));
                    }
                    Step::Complete(result) => {
                        self.state = State::Second(f(result));
                    }
                },
                State::Second(mut next) => match next.resume(entity)? {
                    Step::Yield(proposal) => {
                        self.state = State::Second(next);
                        return Ok(Step::Yield(proposal));
                    }
                    Step::Complete(result) => return Ok(Step::Complete(result)),
                },
                State::Done => panic!("AndThen resumed after completion"),
            }
        }
    }
}
