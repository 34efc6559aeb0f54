//! Synchronous driver.

use super::options::DriveOptions;
use crate::coroutine::{Coroutine, Step};
use tracing::trace;

/// Drives a synchronous computation to completion.
///
/// `seed` is the driver's initial tracked value; a computation with zero
/// yields terminates with `(seed, result)`. Each resumption is fed the
/// current tracked value (or whatever `on_sync` supplies), every yield is
/// resolved against it, passed through `on_yield`, and the hook's return
/// value — not the raw proposal — becomes the new tracked value before the
/// next resumption.
///
/// Failures inside the computation propagate unchanged; the iteration stops
/// and already-accepted yields are not rolled back.
pub fn drive<T, C>(
    mut coroutine: C,
    seed: T,
    mut options: DriveOptions<T, C::Return>,
) -> Result<(T, C::Return), C::Error>
where
    T: Clone,
    C: Coroutine<T>,
{
    let mut tracked = seed;
    loop {
        let fed = match options.on_sync.as_mut() {
            Some(sync) => sync(),
            None => tracked.clone(),
        };
        let step = coroutine.resume(fed)?;
        // Re-read after the step: interleaved work may have moved the slot.
        let current = match options.on_sync.as_mut() {
            Some(sync) => sync(),
            None => tracked.clone(),
        };
        match step {
            Step::Complete(result) => {
                trace!("computation complete");
                if let Some(on_return) = options.on_return.as_mut() {
                    on_return(&result, &current);
                }
                return Ok((current, result));
            }
            Step::Yield(proposal) => {
                let proposed = proposal.resolve(current.clone());
                let accepted = match options.on_yield.as_mut() {
                    Some(on_yield) => on_yield(proposed, &current),
                    None => proposed,
                };
                trace!("yield accepted");
                tracked = accepted;
            }
        }
    }
}
