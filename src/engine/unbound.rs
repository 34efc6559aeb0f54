//! The stateless binding.

use super::Dispatched;
use super::options::{ChangeHook, EngineOptions, Generate};
use super::reconcile::Reconciler;
use crate::coroutine::{AsyncCoroutine, Coroutine};
use crate::drive::{drive, drive_async};
use crate::reducer::{EntityUseCase, ReducerOutcome};
use crate::slot::EntitySlot;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// A domain bound without standing entity storage.
///
/// Created by [`bind_stateless`]. Every entry point takes the entity as its
/// leading argument. Immediate reducers are resolved against that argument
/// alone; suspendable ones get working storage that is created lazily and
/// silently recycled on each call, so nothing leaks between calls.
pub struct UnboundEngine<T, U, G> {
    usecase: Arc<U>,
    slot: Mutex<Option<EntitySlot<T>>>,
    on_change: Mutex<Option<ChangeHook<T>>>,
    generate: G,
}

impl<T, U, G: fmt::Debug> fmt::Debug for UnboundEngine<T, U, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnboundEngine")
            .field("generate", &self.generate)
            .finish_non_exhaustive()
    }
}

/// Binds `usecase` without entity storage.
pub fn bind_stateless<T, U, G>(usecase: U, options: EngineOptions<T, G>) -> UnboundEngine<T, U, G>
where
    T: Clone + PartialEq + Send + 'static,
    U: EntityUseCase<T> + Send + Sync + 'static,
    G: Generate<T>,
{
    let EngineOptions { on_change, generate } = options;
    debug!("stateless binding created");
    UnboundEngine {
        usecase: Arc::new(usecase),
        slot: Mutex::new(None),
        on_change: Mutex::new(on_change),
        generate,
    }
}

impl<T, U, G> UnboundEngine<T, U, G>
where
    T: Clone + PartialEq + Send + 'static,
    U: EntityUseCase<T> + Send + Sync + 'static,
    G: Generate<T>,
{
    /// Returns working storage recycled to hold `entity`.
    ///
    /// The first caller creates the slot and installs the change watcher;
    /// later callers reset the value without notifying.
    fn slot_for(&self, entity: T) -> EntitySlot<T> {
        let mut guard = self.slot.lock();
        if let Some(slot) = guard.as_ref() {
            slot.reset(entity);
            return slot.clone();
        }
        let slot = EntitySlot::new(entity);
        if let Some(hook) = self.on_change.lock().take() {
            slot.watch(hook);
        }
        *guard = Some(slot.clone());
        slot
    }

    fn reconciler(&self, entity: T) -> Reconciler<T, U> {
        Reconciler::new(self.slot_for(entity), Arc::clone(&self.usecase))
    }

    /// Passes an immediate reducer result through untouched.
    ///
    /// The fast path: `entity` is part of the uniform entity-first calling
    /// convention, but no storage is created, reset, or read, and no output
    /// shaping is applied.
    #[allow(clippy::unused_self)]
    pub fn invoke<V>(&self, _entity: T, value: V) -> V {
        value
    }

    /// Drives a suspendable reducer to completion against `entity`.
    pub fn dispatch<C>(&self, entity: T, coroutine: C) -> Result<G::Output<C::Return>, C::Error>
    where
        C: Coroutine<T>,
    {
        let reconciler = self.reconciler(entity.clone());
        let (entity, result) = drive(coroutine, entity, reconciler.drive_options())?;
        Ok(self.generate.generate(entity, result))
    }

    /// Drives an asynchronous suspendable reducer against `entity`.
    pub fn dispatch_async<C>(
        &self,
        entity: T,
        coroutine: C,
    ) -> impl Future<Output = Result<G::Output<C::Return>, C::Error>> + use<T, U, G, C>
    where
        C: AsyncCoroutine<T>,
        G: Clone,
    {
        let reconciler = self.reconciler(entity.clone());
        let future = drive_async(coroutine, entity, reconciler.drive_options());
        let generate = self.generate.clone();
        async move {
            let (entity, result) = future.await?;
            Ok(generate.generate(entity, result))
        }
    }

    /// Runs the canonical commit reducer with `settable` against `entity`.
    pub fn set_entity(&self, entity: T, settable: U::Settable) -> G::Output<T> {
        let reconciler = self.reconciler(entity);
        let entity = reconciler.apply(settable);
        self.generate.generate(entity.clone(), entity)
    }

    /// Routes a classified reducer outcome to [`invoke`](Self::invoke) or
    /// [`dispatch`](Self::dispatch).
    pub fn run<C>(
        &self,
        entity: T,
        outcome: ReducerOutcome<C::Return, C>,
    ) -> Result<Dispatched<C::Return, G::Output<C::Return>>, C::Error>
    where
        C: Coroutine<T>,
    {
        match outcome {
            ReducerOutcome::Immediate(value) => Ok(Dispatched::Raw(self.invoke(entity, value))),
            ReducerOutcome::Suspend(coroutine) => {
                Ok(Dispatched::Generated(self.dispatch(entity, coroutine)?))
            }
        }
    }
}
