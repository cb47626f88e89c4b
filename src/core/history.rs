//! History of committed transitions.
//!
//! Rejected requests are never recorded. `record` is immutable and returns a
//! new history; a running machine appends in place with `push`.

use super::state::MachineState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{MachineState, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     name: "GREEN".to_string(),
///     from: MachineState::from("red"),
///     to: MachineState::from("green"),
///     timestamp: Utc::now(),
/// };
/// assert!(record.changed());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the transition that committed
    pub name: String,
    /// The state being transitioned from
    pub from: MachineState,
    /// The state being transitioned to
    pub to: MachineState,
    /// When the transition committed
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Whether the transition moved to a different state.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Ordered history of committed transitions.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{MachineState, StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = StateHistory::new();
/// let history = history.record(TransitionRecord {
///     name: "GREEN".to_string(),
///     from: MachineState::from("red"),
///     to: MachineState::from("green"),
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path[1], &MachineState::from("green"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<TransitionRecord>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition without copying the existing records.
    pub(crate) fn push(&mut self, transition: TransitionRecord) {
        self.transitions.push(transition);
    }

    /// States traversed: the first `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&MachineState> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Number of committed transitions named `name`.
    pub fn count(&self, name: &str) -> usize {
        self.transitions.iter().filter(|t| t.name == name).count()
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
