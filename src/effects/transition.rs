//! Transition outcomes and errors.

use crate::core::{GuardResult, MachineState};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Why a transition request was rejected.
///
/// Rejections are values inside [`TransitionOutcome`], never returned as
/// `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionError<D> {
    /// At least one guard failed. Carries every guard result, passing ones
    /// included, in declaration order.
    GuardsFailed {
        transition: String,
        data: D,
        guards: Vec<GuardResult>,
    },

    /// A composite machine's current axes do not satisfy the transition's
    /// `from` lists.
    InvalidTransition {
        transition: String,
        state: MachineState,
    },
}

impl<D> TransitionError<D> {
    pub fn transition(&self) -> &str {
        match self {
            Self::GuardsFailed { transition, .. } | Self::InvalidTransition { transition, .. } => {
                transition
            }
        }
    }

    /// Guard results, when the rejection was guard-caused.
    pub fn guards(&self) -> Option<&[GuardResult]> {
        match self {
            Self::GuardsFailed { guards, .. } => Some(guards),
            Self::InvalidTransition { .. } => None,
        }
    }
}

impl<D> fmt::Display for TransitionError<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GuardsFailed { transition, .. } => {
                write!(f, "error in transition: \"{transition}\"")
            }
            Self::InvalidTransition { transition, state } => {
                write!(f, "invalid transition: \"{transition}\" in state: \"{state}\"")
            }
        }
    }
}

impl<D: fmt::Debug> std::error::Error for TransitionError<D> {}

/// Failure raised by a subscriber callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubscriberError {
    pub message: String,
}

impl SubscriberError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Faults reported by a machine, as opposed to normal rejections.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("transition \"{name}\" was not specified")]
    UnknownTransition { name: String },

    #[error("subscriber for \"{event}\" failed: {source}")]
    Subscriber {
        event: String,
        #[source]
        source: SubscriberError,
    },
}

/// Result of a `transition` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome<C, D> {
    pub previous_state: MachineState,
    pub new_state: MachineState,
    /// Whether the state value differs, independent of legality.
    pub state_changed: bool,
    /// Committed context, or the unchanged context on rejection.
    pub context: C,
    pub error: Option<TransitionError<D>>,
    /// Subscriber results in registration order; empty on rejection.
    pub subscriber_results: Vec<Value>,
}
