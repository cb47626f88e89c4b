//! Build errors for machine definitions and builders.

use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No transitions defined. Provide `transitions` or `states`")]
    NoTransitions,

    #[error("Both `transitions` and `states` were provided; use one")]
    ConflictingTables,

    #[error("Transition \"{transition}\" has an empty `from` list")]
    EmptyFromList { transition: String },

    #[error("Transition \"{transition}\" has an empty `from` list for axis \"{axis}\"")]
    EmptyAxisFromList { transition: String, axis: String },

    #[error("Transition \"{transition}\" mixes flat and per-axis definitions in one table")]
    MixedTransitionShapes { transition: String },

    #[error("Initial state \"{state}\" does not fit a {expected} transition table")]
    StateShapeMismatch {
        state: String,
        expected: &'static str,
    },

    #[error("Transition \"{transition}\" references axis \"{axis}\" missing from the initial state")]
    UnknownAxis { transition: String, axis: String },

    #[error("{location} uses \"{token}\", which contains a reserved '|' or ':'")]
    ReservedCharacter { location: String, token: String },

    #[error("State \"{state}\" is not declared in `states`")]
    UnknownStateNode { state: String },

    #[error("Guards registered for undeclared transition \"{transition}\"")]
    GuardForUnknownTransition { transition: String },

    #[error("Invalid machine definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),
}
