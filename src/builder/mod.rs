//! Builder API and declarative definitions for constructing machines.
//!
//! A machine can be assembled with fluent builder calls, from a
//! [`MachineDefinition`] parsed out of JSON, or a mix of both. Everything is
//! validated once in [`MachineBuilder::build`]; a built machine never
//! re-checks its configuration.

pub mod definition;
pub mod error;
pub mod machine;

pub use definition::{MachineDefinition, TransitionSpec};
pub use error::BuildError;
pub use machine::MachineBuilder;
