//! Transition tables.
//!
//! The table is chosen once when a machine is built and never changes. Its
//! variant decides how the "from" check and the destination are computed.

use super::state::{CompositeState, MachineState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wildcard destination: stay in whatever state is current.
pub const STAY: &str = "*";

/// Destination of a flat or state-map transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Target {
    /// Move to the named state.
    State(String),
    /// Remain in the current state.
    Stay,
}

impl Target {
    pub fn state(token: impl Into<String>) -> Self {
        Self::State(token.into())
    }

    /// Destination given the current state.
    pub fn resolve(&self, current: &MachineState) -> MachineState {
        match self {
            Self::State(token) => MachineState::Simple(token.clone()),
            Self::Stay => current.clone(),
        }
    }
}

impl From<String> for Target {
    fn from(token: String) -> Self {
        if token == STAY {
            Self::Stay
        } else {
            Self::State(token)
        }
    }
}

impl From<&str> for Target {
    fn from(token: &str) -> Self {
        Self::from(token.to_string())
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        match target {
            Target::State(token) => token,
            Target::Stay => STAY.to_string(),
        }
    }
}

/// A named edge: allowed prior states and a destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTransition {
    pub from: Vec<String>,
    pub to: Target,
}

impl FlatTransition {
    pub fn new<I, S>(from: I, to: impl Into<Target>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            from: from.into_iter().map(Into::into).collect(),
            to: to.into(),
        }
    }

    pub fn allows(&self, current: &str) -> bool {
        self.from.iter().any(|token| token == current)
    }
}

/// A state node listing its outgoing transitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    #[serde(default)]
    pub on: BTreeMap<String, Target>,
}

impl StateNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, transition: impl Into<String>, target: impl Into<Target>) -> Self {
        self.on.insert(transition.into(), target.into());
        self
    }
}

/// A composite transition with per-axis allow-lists and targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisTransition {
    pub from: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub to: BTreeMap<String, String>,
}

impl AxisTransition {
    pub fn new() -> Self {
        Self {
            from: BTreeMap::new(),
            to: BTreeMap::new(),
        }
    }

    /// Allow the transition when `axis` holds one of `values`.
    pub fn from_axis<I, S>(mut self, axis: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from
            .insert(axis.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Set `axis` to `value` when the transition commits.
    pub fn to_axis(mut self, axis: impl Into<String>, value: impl Into<String>) -> Self {
        self.to.insert(axis.into(), value.into());
        self
    }

    /// Every axis named in `from` holds an allowed value.
    pub fn allows(&self, current: &CompositeState) -> bool {
        self.from.iter().all(|(axis, allowed)| {
            current
                .get(axis)
                .is_some_and(|value| allowed.iter().any(|candidate| candidate == value))
        })
    }

    /// Destination for a transition that passed [`AxisTransition::allows`].
    ///
    /// Only axes named in `from` are written; a `to` entry for an axis
    /// outside `from` has no effect.
    pub fn apply(&self, current: &CompositeState) -> CompositeState {
        let mut next = current.clone();
        for axis in self.from.keys() {
            if let Some(value) = self.to.get(axis) {
                next.set(axis.clone(), value.clone());
            }
        }
        next
    }

    /// All axes referenced by `from` or `to`.
    pub fn referenced_axes(&self) -> impl Iterator<Item = &str> {
        self.from
            .keys()
            .chain(self.to.keys())
            .map(String::as_str)
    }
}

impl Default for AxisTransition {
    fn default() -> Self {
        Self::new()
    }
}

/// The immutable transition table of a machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionTable {
    /// Named edges keyed by transition name.
    Flat(BTreeMap<String, FlatTransition>),
    /// State nodes keyed by state token.
    StateMap(BTreeMap<String, StateNode>),
    /// Composite transitions keyed by transition name.
    PerAxis(BTreeMap<String, AxisTransition>),
}

impl TransitionTable {
    /// Whether `name` is declared anywhere in the table.
    pub fn declares(&self, name: &str) -> bool {
        match self {
            Self::Flat(transitions) => transitions.contains_key(name),
            Self::StateMap(nodes) => nodes.values().any(|node| node.on.contains_key(name)),
            Self::PerAxis(transitions) => transitions.contains_key(name),
        }
    }

    /// All declared transition names, sorted and deduplicated.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match self {
            Self::Flat(transitions) => transitions.keys().map(String::as_str).collect(),
            Self::StateMap(nodes) => nodes
                .values()
                .flat_map(|node| node.on.keys().map(String::as_str))
                .collect(),
            Self::PerAxis(transitions) => transitions.keys().map(String::as_str).collect(),
        };
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(transitions) => transitions.is_empty(),
            Self::StateMap(nodes) => nodes.is_empty(),
            Self::PerAxis(transitions) => transitions.is_empty(),
        }
    }

    /// Whether the machine uses composite states.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::PerAxis(_))
    }

    /// Structural "from" check for a declared transition.
    ///
    /// Returns `false` when the state shape does not match the table.
    pub fn allows(&self, name: &str, current: &MachineState) -> bool {
        match (self, current) {
            (Self::Flat(transitions), MachineState::Simple(token)) => transitions
                .get(name)
                .is_some_and(|transition| transition.allows(token)),
            (Self::StateMap(nodes), MachineState::Simple(token)) => nodes
                .get(token)
                .is_some_and(|node| node.on.contains_key(name)),
            (Self::PerAxis(transitions), MachineState::Composite(state)) => transitions
                .get(name)
                .is_some_and(|transition| transition.allows(state)),
            _ => false,
        }
    }

    /// Destination of a transition that passed [`TransitionTable::allows`].
    ///
    /// Falls back to the current state when `name` has no edge from it.
    pub fn destination(&self, name: &str, current: &MachineState) -> MachineState {
        let destination = match (self, current) {
            (Self::Flat(transitions), _) => transitions
                .get(name)
                .map(|transition| transition.to.resolve(current)),
            (Self::StateMap(nodes), MachineState::Simple(token)) => nodes
                .get(token)
                .and_then(|node| node.on.get(name))
                .map(|target| target.resolve(current)),
            (Self::PerAxis(transitions), MachineState::Composite(state)) => transitions
                .get(name)
                .map(|transition| MachineState::Composite(transition.apply(state))),
            _ => None,
        };
        destination.unwrap_or_else(|| current.clone())
    }
}
