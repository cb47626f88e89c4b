//! Guard predicates for vetoing transitions.
//!
//! Guards are pure functions of the prospective context and the transition
//! data. Every guard registered for a transition runs on every evaluation so
//! that callers can report all failures at once, not only the first.

use std::collections::HashMap;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;
use tracing::trace;

/// Failure returned by a guard that vetoes a transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct GuardFailure {
    pub message: String,
}

impl GuardFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of a single guard.
pub type GuardResult = Result<(), GuardFailure>;

/// Pure predicate that can veto a transition.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{Guard, GuardFailure};
///
/// struct Wallet {
///     credit: u32,
/// }
///
/// let has_credit = Guard::new(|wallet: &Wallet, _data: &()| {
///     if wallet.credit >= 1 {
///         Ok(())
///     } else {
///         Err(GuardFailure::new("you have not enough credit"))
///     }
/// });
///
/// assert!(has_credit.check(&Wallet { credit: 1 }, &()).is_ok());
/// assert!(has_credit.check(&Wallet { credit: 0 }, &()).is_err());
/// ```
pub struct Guard<C, D> {
    predicate: Box<dyn Fn(&C, &D) -> GuardResult + Send + Sync>,
}

impl<C, D> Guard<C, D> {
    /// Create a guard from a function returning `Ok(())` or a failure.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, &D) -> GuardResult + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Create a guard from a boolean predicate and the message to report when
    /// it returns `false`.
    ///
    /// ```rust
    /// use statecraft::core::Guard;
    ///
    /// let positive = Guard::require(|n: &i32, _: &()| *n > 0, "must be positive");
    /// assert_eq!(
    ///     positive.check(&-1, &()).unwrap_err().message,
    ///     "must be positive"
    /// );
    /// ```
    pub fn require<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&C, &D) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::new(move |context, data| {
            if predicate(context, data) {
                Ok(())
            } else {
                Err(GuardFailure::new(message.clone()))
            }
        })
    }

    pub fn check(&self, context: &C, data: &D) -> GuardResult {
        (self.predicate)(context, data)
    }
}

impl<C, D> fmt::Debug for Guard<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

/// Guards keyed by transition name, in declaration order.
pub struct GuardTable<C, D> {
    guards: HashMap<String, Vec<Guard<C, D>>>,
}

impl<C, D> GuardTable<C, D> {
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
        }
    }

    /// Append a guard to the list for `transition`.
    pub fn add(&mut self, transition: impl Into<String>, guard: Guard<C, D>) {
        self.guards.entry(transition.into()).or_default().push(guard);
    }

    /// Guards for `transition`; empty when none are registered.
    pub fn for_transition(&self, transition: &str) -> &[Guard<C, D>] {
        self.guards
            .get(transition)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Transition names that have at least one guard.
    pub fn transitions(&self) -> impl Iterator<Item = &str> {
        self.guards.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.guards.values().all(Vec::is_empty)
    }
}

impl<C, D> Default for GuardTable<C, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> fmt::Debug for GuardTable<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.guards.iter().map(|(name, list)| (name, list.len())))
            .finish()
    }
}

/// Every guard result for one evaluation, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GuardReport {
    pub results: Vec<GuardResult>,
}

impl GuardReport {
    /// True iff at least one guard failed.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(Result::is_err)
    }

    pub fn failures(&self) -> impl Iterator<Item = &GuardFailure> {
        self.results.iter().filter_map(|result| result.as_ref().err())
    }

    /// Accumulate every failure into a single validation.
    pub fn verdict(&self) -> Validation<(), NonEmptyVec<GuardFailure>> {
        let checks: Vec<Validation<(), NonEmptyVec<GuardFailure>>> = self
            .results
            .iter()
            .map(|result| match result {
                Ok(()) => Validation::success(()),
                Err(failure) => Validation::fail(failure.clone()),
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn into_results(self) -> Vec<GuardResult> {
        self.results
    }
}

/// Run every guard registered for `transition` against `context`.
pub fn evaluate_guards<C, D>(
    transition: &str,
    data: &D,
    context: &C,
    table: &GuardTable<C, D>,
) -> GuardReport {
    let results: Vec<GuardResult> = table
        .for_transition(transition)
        .iter()
        .map(|guard| guard.check(context, data))
        .collect();

    trace!(
        transition,
        guards = results.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        "evaluated guards"
    );

    GuardReport { results }
}
