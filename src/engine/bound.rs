//! The entity-carrying binding.

use super::Dispatched;
use super::options::{EngineOptions, Generate};
use super::reconcile::Reconciler;
use crate::coroutine::{AsyncCoroutine, Coroutine};
use crate::drive::{drive, drive_async};
use crate::reducer::{EntityUseCase, ReducerOutcome};
use crate::slot::EntitySlot;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// A domain bound to owned entity storage.
///
/// Created by [`bind_with_entity`]. The engine seeds an
/// [`EntitySlot`](crate::slot::EntitySlot) once; every dispatch reads it,
/// reconciles against it, and leaves the committed value behind for the
/// next dispatch.
pub struct BoundEngine<T, U, G> {
    reconciler: Reconciler<T, U>,
    generate: G,
}

impl<T, U, G: Clone> Clone for BoundEngine<T, U, G> {
    /// Clones the handle. Both handles share the same storage and watchers.
    fn clone(&self) -> Self {
        Self {
            reconciler: self.reconciler.clone(),
            generate: self.generate.clone(),
        }
    }
}

impl<T: fmt::Debug, U, G: fmt::Debug> fmt::Debug for BoundEngine<T, U, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundEngine")
            .field("generate", &self.generate)
            .finish_non_exhaustive()
    }
}

/// Binds `usecase` to storage seeded with `entity`.
pub fn bind_with_entity<T, U, G>(
    usecase: U,
    entity: T,
    options: EngineOptions<T, G>,
) -> BoundEngine<T, U, G>
where
    T: Clone + PartialEq + Send + 'static,
    U: EntityUseCase<T> + Send + Sync + 'static,
    G: Generate<T>,
{
    let EngineOptions { on_change, generate } = options;
    let slot = EntitySlot::new(entity);
    if let Some(hook) = on_change {
        slot.watch(hook);
    }
    debug!("entity binding created");
    BoundEngine {
        reconciler: Reconciler::new(slot, Arc::new(usecase)),
        generate,
    }
}

impl<T, U, G> BoundEngine<T, U, G>
where
    T: Clone + PartialEq + Send + 'static,
    U: EntityUseCase<T> + Send + Sync + 'static,
    G: Generate<T>,
{
    /// Returns the current committed entity.
    pub fn entity(&self) -> T {
        self.reconciler.slot().get()
    }

    /// Registers a change watcher on the underlying storage.
    pub fn watch(&self, watcher: impl FnMut(&T, &T) + Send + 'static) {
        self.reconciler.slot().watch(watcher);
    }

    /// Runs the canonical commit reducer with `settable`.
    ///
    /// The reconciled entity is committed and doubles as the reducer result.
    pub fn set_entity(&self, settable: U::Settable) -> G::Output<T> {
        let entity = self.reconciler.apply(settable);
        self.generate.generate(entity.clone(), entity)
    }

    /// Passes an immediate reducer result through untouched.
    ///
    /// The fast path: no storage interaction, no output shaping. It exists
    /// so callers route every reducer result through the engine and the
    /// immediate/suspending split stays a compile-time property of the call
    /// site.
    #[allow(clippy::unused_self)]
    pub fn invoke<V>(&self, value: V) -> V {
        value
    }

    /// Drives a suspendable reducer to completion.
    ///
    /// Each yield is reconciled and committed before the computation
    /// resumes; a failure stops the iteration without rolling back commits.
    pub fn dispatch<C>(&self, coroutine: C) -> Result<G::Output<C::Return>, C::Error>
    where
        C: Coroutine<T>,
    {
        let seed = self.entity();
        let (entity, result) = drive(coroutine, seed, self.reconciler.drive_options())?;
        Ok(self.generate.generate(entity, result))
    }

    /// Drives an asynchronous suspendable reducer.
    ///
    /// The returned future borrows nothing from the engine, so it can be
    /// spawned or raced freely.
    pub fn dispatch_async<C>(
        &self,
        coroutine: C,
    ) -> impl Future<Output = Result<G::Output<C::Return>, C::Error>> + use<T, U, G, C>
    where
        C: AsyncCoroutine<T>,
        G: Clone,
    {
        let seed = self.entity();
        let future = drive_async(coroutine, seed, self.reconciler.drive_options());
        let generate = self.generate.clone();
        async move {
            let (entity, result) = future.await?;
            Ok(generate.generate(entity, result))
        }
    }

    /// Routes a classified reducer outcome to [`invoke`](Self::invoke) or
    /// [`dispatch`](Self::dispatch).
    pub fn run<C>(
        &self,
        outcome: ReducerOutcome<C::Return, C>,
    ) -> Result<Dispatched<C::Return, G::Output<C::Return>>, C::Error>
    where
        C: Coroutine<T>,
    {
        match outcome {
            ReducerOutcome::Immediate(value) => Ok(Dispatched::Raw(self.invoke(value))),
            ReducerOutcome::Suspend(coroutine) => {
                Ok(Dispatched::Generated(self.dispatch(coroutine)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coroutine::{CoroutineExt, Proposal, Step, YieldOnce, maybe_yield, yield_once};
    use crate::engine::options::ResultOnly;
    use std::convert::Infallible;
    use std::sync::Mutex as StdMutex;

    fn init_test(name: &str) {
        crate::test_logging::init_test_logging();
        crate::test_phase!(name);
    }

    /// Commits are clamped to `0..=max`.
    struct Clamped {
        max: i32,
    }

    impl EntityUseCase<i32> for Clamped {
        type Settable = i32;
        type Commit = YieldOnce<i32, fn(i32) -> i32>;

        fn set_entity(&self, entity: i32, settable: i32) -> Self::Commit {
            let next = settable.clamp(0, self.max);
            let changed = next != entity;
            maybe_yield(changed.then_some(Proposal::Value(next)), std::convert::identity)
        }
    }

    #[test]
    fn dispatch_accumulates_on_storage() {
        init_test("dispatch_accumulates_on_storage");
        let engine = bind_with_entity(Clamped { max: 100 }, 0, EngineOptions::new());

        let add = |n: i32| {
            yield_once(Proposal::derive(move |c: i32| c + n), |c: i32| c)
        };
        let (entity, _) = engine.dispatch(add(3)).unwrap();
        crate::assert_with_log!(entity == 3, "first", 3, entity);
        let (entity, _) = engine.dispatch(add(4)).unwrap();
        crate::assert_with_log!(entity == 7, "second", 7, entity);
        crate::assert_with_log!(engine.entity() == 7, "stored", 7, engine.entity());
        crate::test_complete!("dispatch_accumulates_on_storage");
    }

    #[test]
    fn yields_are_reconciled_before_resumption() {
        init_test("yields_are_reconciled_before_resumption");
        let engine = bind_with_entity(Clamped { max: 10 }, 0, EngineOptions::new());

        // Proposes 50; the commit reducer clamps to 10 and the computation
        // must observe the clamped value when it resumes.
        let c = yield_once(50, |committed: i32| committed);
        let (entity, result) = engine.dispatch(c).unwrap();
        crate::assert_with_log!(entity == 10, "entity", 10, entity);
        crate::assert_with_log!(result == 10, "result", 10, result);
        crate::test_complete!("yields_are_reconciled_before_resumption");
    }

    #[test]
    fn on_change_sees_each_transition() {
        init_test("on_change_sees_each_transition");
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let log = seen.clone();
        let options = EngineOptions::new().with_on_change(move |new: &i32, old: &i32| {
            log.lock().unwrap().push((*new, *old));
        });
        let engine = bind_with_entity(Clamped { max: 100 }, 0, options);

        let c = yield_once(1, |c: i32| c).and_then(|_| yield_once(2, |c: i32| c));
        engine.dispatch(c).unwrap();
        let seen = seen.lock().unwrap();
        let expected = vec![(1, 0), (2, 1)];
        crate::assert_with_log!(*seen == expected, "transitions", expected, *seen);
        crate::test_complete!("on_change_sees_each_transition");
    }

    #[test]
    fn set_entity_commits_directly() {
        init_test("set_entity_commits_directly");
        let engine = bind_with_entity(Clamped { max: 10 }, 0, EngineOptions::new());
        let (entity, result) = engine.set_entity(25);
        crate::assert_with_log!(entity == 10, "entity", 10, entity);
        crate::assert_with_log!(result == 10, "result", 10, result);
        crate::assert_with_log!(engine.entity() == 10, "stored", 10, engine.entity());
        crate::test_complete!("set_entity_commits_directly");
    }

    #[test]
    fn invoke_passes_result_through_raw() {
        init_test("invoke_passes_result_through_raw");
        let engine = bind_with_entity(Clamped { max: 10 }, 4, EngineOptions::new());
        let result = engine.invoke("hello");
        crate::assert_with_log!(result == "hello", "result", "hello", result);
        crate::assert_with_log!(engine.entity() == 4, "unchanged", 4, engine.entity());
        crate::test_complete!("invoke_passes_result_through_raw");
    }

    #[test]
    fn run_classifies_outcomes() {
        init_test("run_classifies_outcomes");
        let engine = bind_with_entity(Clamped { max: 10 }, 0, EngineOptions::new());

        type Add = YieldOnce<i32, fn(i32) -> i32>;
        let immediate: ReducerOutcome<i32, Add> = ReducerOutcome::Immediate(9);
        let out = engine.run(immediate).unwrap();
        // The immediate arm carries the raw result, not the shaped pair.
        let raw = matches!(out, Dispatched::Raw(9));
        crate::assert_with_log!(raw, "immediate is raw", true, raw);

        let suspend: ReducerOutcome<i32, Add> =
            ReducerOutcome::Suspend(maybe_yield(Some(Proposal::Value(5)), std::convert::identity));
        let out = engine.run(suspend).unwrap();
        let generated = matches!(out, Dispatched::Generated((5, 5)));
        crate::assert_with_log!(generated, "suspend is generated", true, generated);
        crate::test_complete!("run_classifies_outcomes");
    }

    #[test]
    fn result_only_shaping() {
        init_test("result_only_shaping");
        let options = EngineOptions::new().with_generate(ResultOnly);
        let engine = bind_with_entity(Clamped { max: 10 }, 0, options);
        let result = engine.dispatch(yield_once(3, |c: i32| c * 2)).unwrap();
        crate::assert_with_log!(result == 6, "result", 6, result);
        crate::test_complete!("result_only_shaping");
    }

    /// Suspendable reducer that can fail mid-iteration.
    struct FailAfterYield {
        yielded: bool,
    }

    impl Coroutine<i32> for FailAfterYield {
        type Return = ();
        type Error = &'static str;

        fn resume(&mut self, _entity: i32) -> Result<Step<i32, ()>, &'static str> {
            if self.yielded {
                Err("validation failed")
            } else {
                self.yielded = true;
                Ok(Step::Yield(Proposal::Value(6)))
            }
        }
    }

    #[test]
    fn failure_keeps_committed_steps() {
        init_test("failure_keeps_committed_steps");
        let engine = bind_with_entity(Clamped { max: 10 }, 0, EngineOptions::new());
        let err = engine.dispatch(FailAfterYield { yielded: false }).unwrap_err();
        crate::assert_with_log!(err == "validation failed", "error", "validation failed", err);
        crate::assert_with_log!(engine.entity() == 6, "kept", 6, engine.entity());
        crate::test_complete!("failure_keeps_committed_steps");
    }

    /// Async reducer: suspends once, yields, then derives its result.
    struct AsyncAdd {
        stage: u8,
        n: i32,
    }

    impl AsyncCoroutine<i32> for AsyncAdd {
        type Return = i32;
        type Error = Infallible;

        fn poll_resume(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            entity: &i32,
        ) -> std::task::Poll<Result<Step<i32, i32>, Infallible>> {
            use std::task::Poll;
            self.stage += 1;
            match self.stage {
                1 => {
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
                2 => {
                    let n = self.n;
                    Poll::Ready(Ok(Step::Yield(Proposal::derive(move |c: i32| c + n))))
                }
                3 => Poll::Ready(Ok(Step::Complete(*entity))),
                _ => panic!("AsyncAdd resumed after completion"),
            }
        }
    }

    #[test]
    fn dispatch_async_commits_like_sync() {
        init_test("dispatch_async_commits_like_sync");
        let engine = bind_with_entity(Clamped { max: 10 }, 2, EngineOptions::new());
        let future = engine.dispatch_async(AsyncAdd { stage: 0, n: 3 });
        let (entity, result) = futures_lite::future::block_on(future).unwrap();
        crate::assert_with_log!(entity == 5, "entity", 5, entity);
        crate::assert_with_log!(result == 5, "result", 5, result);
        crate::assert_with_log!(engine.entity() == 5, "stored", 5, engine.entity());
        crate::test_complete!("dispatch_async_commits_like_sync");
    }
}
