//! Core state machine types and logic.
//!
//! This module contains the pure functional core of the state machine:
//! - State values and their canonical string codec
//! - Transition tables (flat, state-map, per-axis)
//! - Guard predicates and the guard evaluator
//! - The context reducer
//! - Immutable history tracking
//!
//! Nothing in this module mutates a machine; that is the job of
//! [`crate::effects`].

pub mod codec;
mod guard;
mod history;
mod reducer;
mod state;
mod table;

pub use guard::{evaluate_guards, Guard, GuardFailure, GuardReport, GuardResult, GuardTable};
pub use history::{StateHistory, TransitionRecord};
pub use reducer::{reduce, Reducer, TransitionIntent};
pub use state::{CompositeState, MachineState};
pub use table::{AxisTransition, FlatTransition, StateNode, Target, TransitionTable, STAY};
