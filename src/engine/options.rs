//! Engine construction options.

use std::fmt;

/// Observes every committed entity transition with `(new, old)`.
pub type ChangeHook<T> = Box<dyn FnMut(&T, &T) + Send>;

/// Shapes the caller-facing output of the suspending entry points.
///
/// A driven computation always ends up as the terminal `(entity, result)`
/// pair; a `Generate` implementation decides what the caller sees. The
/// output type is generic over the reducer's result, so one hook serves
/// every reducer of the domain. Immediate reducers bypass shaping entirely.
pub trait Generate<T> {
    /// Output for a reducer returning `R`.
    type Output<R>;

    /// Builds the output from the terminal pair.
    fn generate<R>(&self, entity: T, result: R) -> Self::Output<R>;
}

/// The default shape: the `(entity, result)` pair, untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairGenerate;

impl<T> Generate<T> for PairGenerate {
    type Output<R> = (T, R);

    fn generate<R>(&self, entity: T, result: R) -> (T, R) {
        (entity, result)
    }
}

/// Discards the reducer result, returning the terminal entity alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityOnly;

impl<T> Generate<T> for EntityOnly {
    type Output<R> = T;

    fn generate<R>(&self, entity: T, _result: R) -> T {
        entity
    }
}

/// Discards the terminal entity, returning the reducer result alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultOnly;

impl<T> Generate<T> for ResultOnly {
    type Output<R> = R;

    fn generate<R>(&self, _entity: T, result: R) -> R {
        result
    }
}

/// Options accepted by both binding constructors.
#[must_use]
pub struct EngineOptions<T, G = PairGenerate> {
    /// Change watcher installed on the engine's storage.
    pub on_change: Option<ChangeHook<T>>,
    /// Output shaping hook.
    pub generate: G,
}

impl<T> EngineOptions<T, PairGenerate> {
    /// Creates options with no change watcher and pair-shaped output.
    pub fn new() -> Self {
        Self {
            on_change: None,
            generate: PairGenerate,
        }
    }
}

impl<T> Default for EngineOptions<T, PairGenerate> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G> EngineOptions<T, G> {
    /// Sets the change watcher.
    pub fn with_on_change(mut self, hook: impl FnMut(&T, &T) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(hook));
        self
    }

    /// Replaces the output shaping hook.
    pub fn with_generate<G2: Generate<T>>(self, generate: G2) -> EngineOptions<T, G2> {
        EngineOptions {
            on_change: self.on_change,
            generate,
        }
    }
}

impl<T, G: fmt::Debug> fmt::Debug for EngineOptions<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("on_change", &self.on_change.is_some())
            .field("generate", &self.generate)
            .finish()
    }
}
