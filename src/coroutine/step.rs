//! Resumption outcomes: yielded proposals and terminal results.

use std::fmt;

/// A yielded entity proposal.
///
/// A computation either proposes a concrete replacement value or a derivation
/// over whatever value the driver currently tracks. The derivation form exists
/// for computations that resume after an await point and cannot know whether
/// the entity changed underneath them in the interim.
pub enum Proposal<T> {
    /// A concrete replacement value.
    Value(T),
    /// A pure derivation evaluated against the driver's current tracked value.
    Derive(Box<dyn FnOnce(T) -> T + Send>),
}

impl<T> Proposal<T> {
    /// Creates a derivation proposal from a closure over the current entity.
    pub fn derive(f: impl FnOnce(T) -> T + Send + 'static) -> Self {
        Self::Derive(Box::new(f))
    }

    /// Resolves the proposal against the driver's current tracked value.
    ///
    /// `Value` proposals ignore `current`; `Derive` proposals consume it.
    pub fn resolve(self, current: T) -> T {
        match self {
            Self::Value(value) => value,
            Self::Derive(f) => f(current),
        }
    }
}

impl<T> From<T> for Proposal<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Proposal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Derive(_) => f.debug_tuple("Derive").field(&"..").finish(),
        }
    }
}

/// The outcome of one resumption step.
#[derive(Debug)]
pub enum Step<T, R> {
    /// The computation suspended with an entity proposal.
    Yield(Proposal<T>),
    /// The computation terminated with a result.
    Complete(R),
}

impl<T, R> Step<T, R> {
    /// Returns `true` if this step is a yield.
    #[must_use]
    pub fn is_yield(&self) -> bool {
        matches!(self, Self::Yield(_))
    }

    /// Returns `true` if this step completed the computation.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}
