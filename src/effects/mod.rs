//! The imperative shell around the pure core.
//!
//! This module owns everything that mutates a machine or touches the outside
//! world:
//!
//! - **Machine**: evaluates requests and commits state and context
//! - **Outcomes**: the result value of every transition request
//! - **Subscribers**: async callbacks fanned out after a commit
//!
//! Rejections are ordinary values in [`TransitionOutcome`]. Only undeclared
//! transitions and failing subscribers surface as [`MachineError`].

mod machine;
mod subscribers;
mod transition;

pub use machine::Machine;
pub use subscribers::{Subscriber, SubscriberRegistry, SubscriberResult};
pub use transition::{MachineError, SubscriberError, TransitionError, TransitionOutcome};
