//! Serializable machine definitions.
//!
//! A definition describes states and transitions only. Guards, reducers and
//! subscribers are code and are attached through [`super::MachineBuilder`].
//!
//! ```json
//! {
//!   "initialState": "idle",
//!   "transitions": {
//!     "INSERTMONEY": { "from": ["idle", "buying"], "to": "buying" },
//!     "BUY": { "from": ["buying"], "to": "idle" }
//!   }
//! }
//! ```

use crate::builder::error::BuildError;
use crate::core::{AxisTransition, FlatTransition, MachineState, StateNode, TransitionTable};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One entry of the `transitions` table, in either shape.
///
/// A `from` list makes a flat transition; a `from` map of axis lists makes a
/// per-axis one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TransitionSpec {
    Flat(FlatTransition),
    PerAxis(AxisTransition),
}

impl TransitionSpec {
    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value.get("from") {
            Some(Value::Object(_)) => serde_json::from_value(value).map(Self::PerAxis),
            _ => serde_json::from_value(value).map(Self::Flat),
        }
    }
}

impl<'de> Deserialize<'de> for TransitionSpec {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

/// Deserialize the `transitions` table, naming the entry that failed.
fn named_transitions<'de, De>(
    deserializer: De,
) -> Result<BTreeMap<String, TransitionSpec>, De::Error>
where
    De: Deserializer<'de>,
{
    BTreeMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(name, value)| match TransitionSpec::from_value(value) {
            Ok(spec) => Ok((name, spec)),
            Err(error) => Err(de::Error::custom(format!(
                "transition \"{name}\": {error}"
            ))),
        })
        .collect()
}

impl From<FlatTransition> for TransitionSpec {
    fn from(transition: FlatTransition) -> Self {
        Self::Flat(transition)
    }
}

impl From<AxisTransition> for TransitionSpec {
    fn from(transition: AxisTransition) -> Self {
        Self::PerAxis(transition)
    }
}

/// Declarative description of a machine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<MachineState>,

    #[serde(
        default,
        deserialize_with = "named_transitions",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub transitions: BTreeMap<String, TransitionSpec>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub states: BTreeMap<String, StateNode>,
}

impl MachineDefinition {
    /// Parse a definition from JSON.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecraft::builder::MachineDefinition;
    ///
    /// let definition = MachineDefinition::from_json(
    ///     r#"{"initialState": "red", "transitions": {"GREEN": {"from": ["red"], "to": "green"}}}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(definition.transitions.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the declared tables into a single [`TransitionTable`].
    pub fn table(&self) -> Result<TransitionTable, BuildError> {
        assemble_table(&self.transitions, &self.states)
    }
}

/// Pick the table variant from whichever tables are populated.
pub(crate) fn assemble_table(
    transitions: &BTreeMap<String, TransitionSpec>,
    states: &BTreeMap<String, StateNode>,
) -> Result<TransitionTable, BuildError> {
    match (transitions.is_empty(), states.is_empty()) {
        (true, true) => Err(BuildError::NoTransitions),
        (false, false) => Err(BuildError::ConflictingTables),
        (true, false) => Ok(TransitionTable::StateMap(states.clone())),
        (false, true) => split_transitions(transitions),
    }
}

fn split_transitions(
    transitions: &BTreeMap<String, TransitionSpec>,
) -> Result<TransitionTable, BuildError> {
    let mut flat = BTreeMap::new();
    let mut per_axis = BTreeMap::new();

    for (name, spec) in transitions {
        match spec {
            TransitionSpec::Flat(transition) => {
                flat.insert(name.clone(), transition.clone());
            }
            TransitionSpec::PerAxis(transition) => {
                per_axis.insert(name.clone(), transition.clone());
            }
        }
        if !flat.is_empty() && !per_axis.is_empty() {
            return Err(BuildError::MixedTransitionShapes {
                transition: name.clone(),
            });
        }
    }

    if per_axis.is_empty() {
        Ok(TransitionTable::Flat(flat))
    } else {
        Ok(TransitionTable::PerAxis(per_axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompositeState, Target};

    #[test]
    fn parses_flat_definition() {
        let definition = MachineDefinition::from_json(
            r#"{
                "initialState": "idle",
                "transitions": {
                    "CHANGE": { "from": ["idle"], "to": "*" },
                    "SUBMIT": { "from": ["idle"], "to": "submitting" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(definition.initial_state, Some(MachineState::from("idle")));
        match definition.table().unwrap() {
            TransitionTable::Flat(transitions) => {
                assert_eq!(transitions["CHANGE"].to, Target::Stay);
                assert_eq!(transitions["SUBMIT"].to, Target::state("submitting"));
            }
            other => panic!("Expected flat table, got {other:?}"),
        }
    }

    #[test]
    fn parses_composite_definition() {
        let definition = MachineDefinition::from_json(
            r#"{
                "initialState": { "a": "one", "b": "one" },
                "transitions": {
                    "a2": {
                        "from": { "a": ["one", "three"], "b": ["one", "two", "three"] },
                        "to": { "a": "two" }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            definition.initial_state,
            Some(MachineState::from(
                CompositeState::new().with("a", "one").with("b", "one")
            ))
        );
        assert!(definition.table().unwrap().is_composite());
    }

    #[test]
    fn parses_state_map_definition() {
        let definition = MachineDefinition::from_json(
            r#"{
                "initialState": "one",
                "states": {
                    "one": { "on": { "TWO": "two" } },
                    "two": { "on": { "ONE": "one" } }
                }
            }"#,
        )
        .unwrap();

        let table = definition.table().unwrap();
        assert!(matches!(table, TransitionTable::StateMap(_)));
        assert_eq!(table.names(), vec!["ONE", "TWO"]);
    }

    #[test]
    fn missing_tables_are_rejected() {
        let definition = MachineDefinition::from_json(r#"{"initialState": "a:foo|b:bar"}"#).unwrap();
        assert!(matches!(definition.table(), Err(BuildError::NoTransitions)));
    }

    #[test]
    fn both_tables_are_rejected() {
        let definition = MachineDefinition::from_json(
            r#"{
                "initialState": "one",
                "transitions": { "GO": { "from": ["one"], "to": "two" } },
                "states": { "one": { "on": { "GO": "two" } } }
            }"#,
        )
        .unwrap();

        assert!(matches!(
            definition.table(),
            Err(BuildError::ConflictingTables)
        ));
    }

    #[test]
    fn mixed_shapes_are_rejected() {
        let definition = MachineDefinition::from_json(
            r#"{
                "initialState": "a:one",
                "transitions": {
                    "flat": { "from": ["one"], "to": "two" },
                    "axis": { "from": { "a": ["one"] }, "to": { "a": "two" } }
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(
            definition.table(),
            Err(BuildError::MixedTransitionShapes { .. })
        ));
    }

    #[test]
    fn malformed_json_is_invalid_definition() {
        let result = MachineDefinition::from_json("{ not json");
        assert!(matches!(result, Err(BuildError::InvalidDefinition(_))));
    }

    #[test]
    fn malformed_transition_error_names_the_transition() {
        let error = MachineDefinition::from_json(
            r#"{
                "initialState": "idle",
                "transitions": {
                    "GO": { "from": ["idle"], "to": "busy" },
                    "STOP": { "from": ["busy"], "to": 3 }
                }
            }"#,
        )
        .unwrap_err();

        assert!(matches!(error, BuildError::InvalidDefinition(_)));
        assert!(error.to_string().contains("transition \"STOP\""));
    }

    #[test]
    fn malformed_axis_transition_error_names_the_transition() {
        let error = MachineDefinition::from_json(
            r#"{
                "initialState": "a:one",
                "transitions": {
                    "a2": { "from": { "a": "one" }, "to": { "a": "two" } }
                }
            }"#,
        )
        .unwrap_err();

        assert!(error.to_string().contains("transition \"a2\""));
    }

    #[test]
    fn definition_serializes_correctly() {
        let mut definition = MachineDefinition {
            initial_state: Some(MachineState::from("red")),
            ..MachineDefinition::default()
        };
        definition.transitions.insert(
            "GREEN".to_string(),
            FlatTransition::new(["red"], "green").into(),
        );

        let json = serde_json::to_string(&definition).unwrap();
        let deserialized = MachineDefinition::from_json(&json).unwrap();
        assert_eq!(definition, deserialized);
    }
}
