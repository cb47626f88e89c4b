//! Statecraft: a declarative finite state machine
//!
//! Statecraft follows a "pure core, imperative shell" layout. The core
//! decides whether a transition is legal and what it leads to using only
//! pure functions; the shell commits the result and notifies subscribers.
//!
//! # Core Concepts
//!
//! - **State**: a single token, or a composite of independent axes
//! - **Transition table**: flat edges, state nodes, or per-axis rules,
//!   chosen once when the machine is built
//! - **Guards**: pure predicates that can veto a transition
//! - **Reducer**: computes the next context for every transition request
//! - **Subscribers**: async callbacks run after a transition commits
//!
//! # Example
//!
//! ```rust
//! use statecraft::builder::MachineBuilder;
//! use statecraft::core::{FlatTransition, Guard, MachineState, TransitionIntent};
//! use statecraft::Machine;
//!
//! # futures::executor::block_on(async {
//! let mut machine: Machine<u32, u32> = MachineBuilder::with_context(0)
//!     .initial("idle")
//!     .transition("INSERT", FlatTransition::new(["idle", "buying"], "buying"))
//!     .transition("BUY", FlatTransition::new(["buying"], "idle"))
//!     .reducer(|credit: &u32, intent: TransitionIntent<'_, u32>| match intent.name {
//!         "INSERT" => credit + intent.data,
//!         _ => *credit,
//!     })
//!     .guard("BUY", Guard::require(|credit: &u32, _: &u32| *credit >= 2, "not enough credit"))
//!     .build()
//!     .unwrap();
//!
//! machine.transition("INSERT", 1).await.unwrap();
//! let rejected = machine.transition("BUY", 0).await.unwrap();
//! assert!(rejected.error.is_some());
//!
//! machine.transition("INSERT", 1).await.unwrap();
//! let bought = machine.transition("BUY", 0).await.unwrap();
//! assert_eq!(bought.new_state, MachineState::from("idle"));
//! # });
//! ```

pub mod builder;
pub mod core;
pub mod effects;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder, MachineDefinition};
pub use crate::core::{CompositeState, Guard, GuardFailure, MachineState, StateHistory, Target};
pub use crate::effects::{Machine, MachineError, TransitionError, TransitionOutcome};
