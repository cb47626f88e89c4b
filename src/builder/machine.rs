//! Builder for constructing machines.

use crate::builder::definition::{assemble_table, MachineDefinition, TransitionSpec};
use crate::builder::error::BuildError;
use crate::core::codec::is_encodable;
use crate::core::{
    AxisTransition, CompositeState, FlatTransition, Guard, GuardTable, MachineState, Reducer,
    StateNode, Target, TransitionIntent, TransitionTable,
};
use crate::effects::Machine;
use std::collections::BTreeMap;
use tracing::debug;

/// Builder for constructing machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::MachineBuilder;
/// use statecraft::core::FlatTransition;
/// use statecraft::Machine;
///
/// let machine: Machine<()> = MachineBuilder::new()
///     .initial("red")
///     .transition("GREEN", FlatTransition::new(["red"], "green"))
///     .transition("YELLOW", FlatTransition::new(["green"], "yellow"))
///     .transition("RED", FlatTransition::new(["yellow"], "red"))
///     .build()
///     .unwrap();
///
/// assert!(machine.can("GREEN", &()).unwrap());
/// assert!(!machine.can("RED", &()).unwrap());
/// ```
pub struct MachineBuilder<C, D = ()> {
    initial: Option<MachineState>,
    context: C,
    transitions: BTreeMap<String, TransitionSpec>,
    states: BTreeMap<String, StateNode>,
    reducer: Option<Reducer<C, D>>,
    guards: Vec<(String, Guard<C, D>)>,
}

impl<C: Default, D> MachineBuilder<C, D> {
    /// Create a builder whose context starts at `C::default()`.
    pub fn new() -> Self {
        Self::with_context(C::default())
    }
}

impl<C: Default, D> Default for MachineBuilder<C, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> MachineBuilder<C, D> {
    /// Create a builder with an initial context.
    pub fn with_context(context: C) -> Self {
        Self {
            initial: None,
            context,
            transitions: BTreeMap::new(),
            states: BTreeMap::new(),
            reducer: None,
            guards: Vec::new(),
        }
    }

    /// Set the initial state (required).
    ///
    /// A composite machine also accepts the encoded form, e.g. `"a:one|b:one"`.
    pub fn initial(mut self, state: impl Into<MachineState>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Replace the initial context.
    pub fn context(mut self, context: C) -> Self {
        self.context = context;
        self
    }

    /// Add a flat transition.
    pub fn transition(mut self, name: impl Into<String>, transition: FlatTransition) -> Self {
        self.transitions
            .insert(name.into(), TransitionSpec::Flat(transition));
        self
    }

    /// Add a per-axis transition for a composite machine.
    pub fn axis_transition(mut self, name: impl Into<String>, transition: AxisTransition) -> Self {
        self.transitions
            .insert(name.into(), TransitionSpec::PerAxis(transition));
        self
    }

    /// Add a state node for a state-map machine.
    pub fn state_node(mut self, state: impl Into<String>, node: StateNode) -> Self {
        self.states.insert(state.into(), node);
        self
    }

    /// Merge a declarative definition into the builder.
    ///
    /// The definition's initial state, when present, replaces the current one.
    pub fn definition(mut self, definition: MachineDefinition) -> Self {
        if let Some(initial) = definition.initial_state {
            self.initial = Some(initial);
        }
        self.transitions.extend(definition.transitions);
        self.states.extend(definition.states);
        self
    }

    /// Set the context reducer (optional).
    pub fn reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&C, TransitionIntent<'_, D>) -> C + Send + Sync + 'static,
    {
        self.reducer = Some(Box::new(reducer));
        self
    }

    /// Append a guard for `transition` (optional).
    pub fn guard(mut self, transition: impl Into<String>, guard: Guard<C, D>) -> Self {
        self.guards.push((transition.into(), guard));
        self
    }

    /// Build the machine.
    /// Returns an error if required fields are missing or the tables are
    /// inconsistent with each other or with the initial state.
    pub fn build(self) -> Result<Machine<C, D>, BuildError>
    where
        C: Clone + Send + 'static,
        D: Clone + Send + 'static,
    {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let table = assemble_table(&self.transitions, &self.states)?;

        validate_from_lists(&table)?;
        let initial = fit_initial_state(&table, initial)?;
        validate_encodable(&table, &initial)?;
        validate_references(&table, &initial)?;

        let mut guards = GuardTable::new();
        for (transition, guard) in self.guards {
            if !table.declares(&transition) {
                return Err(BuildError::GuardForUnknownTransition { transition });
            }
            guards.add(transition, guard);
        }

        debug!(
            initial = %initial,
            transitions = table.names().len(),
            composite = table.is_composite(),
            "machine built"
        );

        Ok(Machine::new(initial, self.context, table, self.reducer, guards))
    }
}

fn validate_from_lists(table: &TransitionTable) -> Result<(), BuildError> {
    match table {
        TransitionTable::Flat(transitions) => {
            if let Some((name, _)) = transitions.iter().find(|(_, t)| t.from.is_empty()) {
                return Err(BuildError::EmptyFromList {
                    transition: name.clone(),
                });
            }
        }
        TransitionTable::PerAxis(transitions) => {
            for (name, transition) in transitions {
                if transition.from.is_empty() {
                    return Err(BuildError::EmptyFromList {
                        transition: name.clone(),
                    });
                }
                if let Some((axis, _)) = transition.from.iter().find(|(_, v)| v.is_empty()) {
                    return Err(BuildError::EmptyAxisFromList {
                        transition: name.clone(),
                        axis: axis.clone(),
                    });
                }
            }
        }
        TransitionTable::StateMap(_) => {}
    }
    Ok(())
}

/// Check the initial state's shape against the table, decoding an encoded
/// composite state where needed.
fn fit_initial_state(
    table: &TransitionTable,
    initial: MachineState,
) -> Result<MachineState, BuildError> {
    match (table, initial) {
        (TransitionTable::PerAxis(_), MachineState::Simple(encoded)) => {
            let state = CompositeState::decode(&encoded);
            if state.is_empty() {
                return Err(BuildError::StateShapeMismatch {
                    state: encoded,
                    expected: "per-axis",
                });
            }
            Ok(MachineState::Composite(state))
        }
        (TransitionTable::PerAxis(_), initial @ MachineState::Composite(_)) => Ok(initial),
        (TransitionTable::Flat(_), MachineState::Composite(state)) => {
            Err(BuildError::StateShapeMismatch {
                state: state.to_string(),
                expected: "flat",
            })
        }
        (TransitionTable::StateMap(_), MachineState::Composite(state)) => {
            Err(BuildError::StateShapeMismatch {
                state: state.to_string(),
                expected: "state-map",
            })
        }
        (_, initial) => Ok(initial),
    }
}

/// Composite axis names and values must survive the string encoding.
fn validate_encodable(table: &TransitionTable, initial: &MachineState) -> Result<(), BuildError> {
    let reserved = |location: String, token: &str| {
        if is_encodable(token) {
            Ok(())
        } else {
            Err(BuildError::ReservedCharacter {
                location,
                token: token.to_string(),
            })
        }
    };

    if let MachineState::Composite(state) = initial {
        for (axis, value) in state.iter() {
            reserved("initial state".to_string(), axis)?;
            reserved("initial state".to_string(), value)?;
        }
    }

    if let TransitionTable::PerAxis(transitions) = table {
        for (name, transition) in transitions {
            let location = || format!("transition \"{name}\"");
            for (axis, values) in &transition.from {
                reserved(location(), axis)?;
                for value in values {
                    reserved(location(), value)?;
                }
            }
            for (axis, value) in &transition.to {
                reserved(location(), axis)?;
                reserved(location(), value)?;
            }
        }
    }
    Ok(())
}

fn validate_references(table: &TransitionTable, initial: &MachineState) -> Result<(), BuildError> {
    match (table, initial) {
        (TransitionTable::PerAxis(transitions), MachineState::Composite(state)) => {
            for (name, transition) in transitions {
                if let Some(axis) = transition
                    .referenced_axes()
                    .find(|axis| !state.contains_axis(axis))
                {
                    return Err(BuildError::UnknownAxis {
                        transition: name.clone(),
                        axis: axis.to_string(),
                    });
                }
            }
        }
        (TransitionTable::StateMap(nodes), MachineState::Simple(token)) => {
            if !nodes.contains_key(token) {
                return Err(BuildError::UnknownStateNode {
                    state: token.clone(),
                });
            }
            let unknown = nodes
                .values()
                .flat_map(|node| node.on.values())
                .find_map(|target| match target {
                    Target::State(state) if !nodes.contains_key(state) => Some(state),
                    _ => None,
                });
            if let Some(state) = unknown {
                return Err(BuildError::UnknownStateNode {
                    state: state.clone(),
                });
            }
        }
        _ => {}
    }
    Ok(())
}
