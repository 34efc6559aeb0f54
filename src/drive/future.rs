//! Asynchronous driver.

use super::options::DriveOptions;
use crate::coroutine::{AsyncCoroutine, Step};
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::trace;

/// The deferred `(entity, result)` pair.
///
/// Created by [`drive_async`]. Resolves once the computation terminates;
/// a failure in any step rejects the whole future.
#[pin_project]
#[must_use = "futures do nothing unless polled"]
pub struct DriveFuture<T, C>
where
    C: AsyncCoroutine<T>,
{
    #[pin]
    coroutine: C,
    tracked: Option<T>,
    options: DriveOptions<T, C::Return>,
}

/// Drives an asynchronous computation to completion.
///
/// Semantics are identical to [`drive`](super::drive): same seeding, same
/// resolution of function-valued yields, same hook ordering. The only
/// difference is that any step may be `Pending`, so the terminal pair is
/// deferred.
pub fn drive_async<T, C>(
    coroutine: C,
    seed: T,
    options: DriveOptions<T, C::Return>,
) -> DriveFuture<T, C>
where
    T: Clone,
    C: AsyncCoroutine<T>,
{
    DriveFuture {
        coroutine,
        tracked: Some(seed),
        options,
    }
}

impl<T, C> Future for DriveFuture<T, C>
where
    T: Clone,
    C: AsyncCoroutine<T>,
{
    type Output = Result<(T, C::Return), C::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        loop {
            let fed = match this.options.on_sync.as_mut() {
                Some(sync) => sync(),
                None => this
                    .tracked
                    .clone()
                    .expect("DriveFuture polled after completion"),
            };
            let step = match this.coroutine.as_mut().poll_resume(cx, &fed) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(error)) => {
                    this.tracked.take();
                    return Poll::Ready(Err(error));
                }
                Poll::Ready(Ok(step)) => step,
            };
            // Re-read after the step: interleaved work may have moved the slot.
            let current = match this.options.on_sync.as_mut() {
                Some(sync) => sync(),
                None => this
                    .tracked
                    .clone()
                    .expect("DriveFuture polled after completion"),
            };
            match step {
                Step::Complete(result) => {
                    trace!("computation complete");
                    if let Some(on_return) = this.options.on_return.as_mut() {
                        on_return(&result, &current);
                    }
                    this.tracked.take();
                    return Poll::Ready(Ok((current, result)));
                }
                Step::Yield(proposal) => {
                    let proposed = proposal.resolve(current.clone());
                    let accepted = match this.options.on_yield.as_mut() {
                        Some(on_yield) => on_yield(proposed, &current),
                        None => proposed,
                    };
                    trace!("yield accepted");
                    *this.tracked = Some(accepted);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coroutine::Proposal;
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};
    use std::task::{Wake, Waker};

    struct NoopWaker;

    impl Wake for NoopWaker {
        fn wake(self: Arc<Self>) {}
    }

    fn noop_waker() -> Waker {
        Waker::from(Arc::new(NoopWaker))
    }

    fn init_test(name: &str) {
        crate::test_logging::init_test_logging();
        crate::test_phase!(name);
    }

    /// Awaited suspensions surrounding one yield: Pending, yield, Pending,
    /// complete — the async shape of the two-step sync computation.
    struct AwaitYieldAwait {
        stage: u8,
    }

    impl AsyncCoroutine<i32> for AwaitYieldAwait {
        type Return = String;
        type Error = Infallible;

        fn poll_resume(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            entity: &i32,
        ) -> Poll<Result<Step<i32, String>, Infallible>> {
            self.stage += 1;
            match self.stage {
                1 | 3 => {
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
                2 => Poll::Ready(Ok(Step::Yield(Proposal::Value(3)))),
                4 => Poll::Ready(Ok(Step::Complete(format!("[{entity}]")))),
                _ => panic!("AwaitYieldAwait resumed after completion"),
            }
        }
    }

    #[test]
    fn deferred_pair_resolves() {
        init_test("deferred_pair_resolves");
        let future = drive_async(AwaitYieldAwait { stage: 0 }, 1, DriveOptions::new());
        let (entity, result) = futures_lite::future::block_on(future).unwrap();
        crate::assert_with_log!(entity == 3, "entity", 3, entity);
        crate::assert_with_log!(result == "[3]", "result", "[3]", result);
        crate::test_complete!("deferred_pair_resolves");
    }

    #[test]
    fn pending_without_yield_keeps_tracked() {
        init_test("pending_without_yield_keeps_tracked");
        let mut future = drive_async(AwaitYieldAwait { stage: 0 }, 1, DriveOptions::new());
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        // First poll: Pending before any yield.
        let poll = Pin::new(&mut future).poll(&mut cx);
        crate::assert_with_log!(poll.is_pending(), "pending", true, poll.is_pending());

        // Second poll: the yield commits, then the second await parks again.
        let poll = Pin::new(&mut future).poll(&mut cx);
        crate::assert_with_log!(poll.is_pending(), "pending again", true, poll.is_pending());

        let poll = Pin::new(&mut future).poll(&mut cx);
        let done = matches!(poll, Poll::Ready(Ok((3, ref s))) if s == "[3]");
        crate::assert_with_log!(done, "resolved", true, done);
        crate::test_complete!("pending_without_yield_keeps_tracked");
    }

    /// Fails after its yield was accepted.
    struct YieldThenReject {
        yielded: bool,
    }

    impl AsyncCoroutine<i32> for YieldThenReject {
        type Return = ();
        type Error = &'static str;

        fn poll_resume(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _entity: &i32,
        ) -> Poll<Result<Step<i32, ()>, &'static str>> {
            if self.yielded {
                Poll::Ready(Err("rejected"))
            } else {
                self.yielded = true;
                Poll::Ready(Ok(Step::Yield(Proposal::Value(9))))
            }
        }
    }

    #[test]
    fn rejection_propagates_and_keeps_commits() {
        init_test("rejection_propagates_and_keeps_commits");
        let committed = Arc::new(Mutex::new(Vec::new()));
        let log = committed.clone();
        let options = DriveOptions::new().with_on_yield(move |proposed: i32, _old: &i32| {
            log.lock().unwrap().push(proposed);
            proposed
        });
        let future = drive_async(YieldThenReject { yielded: false }, 0, options);
        let err = futures_lite::future::block_on(future).unwrap_err();
        crate::assert_with_log!(err == "rejected", "error", "rejected", err);
        let committed = committed.lock().unwrap();
        crate::assert_with_log!(*committed == vec![9], "committed", vec![9], *committed);
        crate::test_complete!("rejection_propagates_and_keeps_commits");
    }
}
