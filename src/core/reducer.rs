//! Context reduction.
//!
//! The reducer maps the current context and a transition request to the next
//! context. It runs for every request, including ones that end up rejected,
//! so guards can inspect the prospective context.

/// A transition request as seen by the reducer.
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionIntent<'a, D> {
    pub name: &'a str,
    pub data: &'a D,
}

impl<D> Clone for TransitionIntent<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for TransitionIntent<'_, D> {}

/// Pure function producing the next context.
pub type Reducer<C, D> = Box<dyn Fn(&C, TransitionIntent<'_, D>) -> C + Send + Sync>;

/// Apply `reducer`, or return a copy of `context` when there is none.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{reduce, Reducer, TransitionIntent};
///
/// let add: Reducer<u32, u32> = Box::new(|credit: &u32, intent: TransitionIntent<'_, u32>| match intent.name {
///     "INSERT" => credit + intent.data,
///     _ => *credit,
/// });
///
/// let intent = TransitionIntent { name: "INSERT", data: &2 };
/// assert_eq!(reduce(Some(&add), &1, intent), 3);
/// assert_eq!(reduce(None, &1, intent), 1);
/// ```
pub fn reduce<C: Clone, D>(
    reducer: Option<&Reducer<C, D>>,
    context: &C,
    intent: TransitionIntent<'_, D>,
) -> C {
    match reducer {
        Some(reducer) => reducer(context, intent),
        None => context.clone(),
    }
}
