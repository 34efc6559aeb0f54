//! Proposal reconciliation.

use crate::drive::{DriveOptions, drive};
use crate::reducer::EntityUseCase;
use crate::slot::EntitySlot;
use std::sync::Arc;
use tracing::debug;

/// Routes proposals through the domain's canonical commit reducer and into
/// shared storage.
///
/// This is the single writer: nothing else in the engine touches the slot's
/// `set` path. Outer reducers propose, the reconciler commits.
pub(crate) struct Reconciler<T, U> {
    slot: EntitySlot<T>,
    usecase: Arc<U>,
}

impl<T, U> Clone for Reconciler<T, U> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            usecase: Arc::clone(&self.usecase),
        }
    }
}

impl<T, U> Reconciler<T, U>
where
    T: Clone + PartialEq + Send + 'static,
    U: EntityUseCase<T> + Send + Sync + 'static,
{
    pub(crate) fn new(slot: EntitySlot<T>, usecase: Arc<U>) -> Self {
        Self { slot, usecase }
    }

    pub(crate) fn slot(&self) -> &EntitySlot<T> {
        &self.slot
    }

    /// Applies a settable input through the commit reducer.
    ///
    /// Each yield of the commit computation is written to the slot verbatim;
    /// the computation's terminal entity is the authoritative value returned
    /// to the caller.
    pub(crate) fn apply(&self, settable: U::Settable) -> T {
        let old = self.slot.get();
        let commit = self.usecase.set_entity(old.clone(), settable);
        let slot = self.slot.clone();
        let read = self.slot.clone();
        let options = DriveOptions::new()
            .with_on_sync(move || read.get())
            .with_on_yield(move |reconciled: T, _old: &T| {
                slot.set(reconciled.clone());
                reconciled
            });
        let (_, authoritative) = match drive(commit, old, options) {
            Ok(pair) => pair,
            Err(never) => match never {},
        };
        debug!("settable applied");
        authoritative
    }

    /// Commits a raw proposed entity through the same reconciliation path.
    pub(crate) fn commit(&self, proposed: T) -> T {
        self.apply(U::Settable::from(proposed))
    }

    /// Hook bundle for driving an outer reducer against this storage.
    ///
    /// Every resumption reads the slot; every yield is reconciled and
    /// committed before the computation continues.
    pub(crate) fn drive_options<R>(&self) -> DriveOptions<T, R> {
        let read = self.slot.clone();
        let this = self.clone();
        DriveOptions::new()
            .with_on_sync(move || read.get())
            .with_on_yield(move |proposed: T, _old: &T| this.commit(proposed))
    }
}
