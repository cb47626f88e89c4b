//! State values tracked by a machine.
//!
//! A machine is either in a single named state (`MachineState::Simple`) or in
//! a composite state made of independent axes (`MachineState::Composite`).

use super::codec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Composite state: a mapping from axis name to axis value.
///
/// Axes are kept in lexicographic order so that equal states always compare,
/// iterate, and encode identically regardless of how they were built.
///
/// # Example
///
/// ```rust
/// use statecraft::core::CompositeState;
///
/// let state: CompositeState = "b:bar|a:foo".parse().unwrap();
/// assert_eq!(state.get("a"), Some("foo"));
/// assert_eq!(state.to_string(), "a:foo|b:bar");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeState(BTreeMap<String, String>);

impl CompositeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of an axis value.
    pub fn with(mut self, axis: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(axis.into(), value.into());
        self
    }

    /// Current value of `axis`, if the axis exists.
    pub fn get(&self, axis: &str) -> Option<&str> {
        self.0.get(axis).map(String::as_str)
    }

    pub fn contains_axis(&self, axis: &str) -> bool {
        self.0.contains_key(axis)
    }

    /// Set `axis` to `value`, returning the previous value.
    pub fn set(&mut self, axis: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(axis.into(), value.into())
    }

    pub fn axes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Canonical string form, see [`codec::encode`].
    pub fn encode(&self) -> String {
        codec::encode(&self.0)
    }

    /// Parse a canonical string, see [`codec::decode`].
    pub fn decode(encoded: &str) -> Self {
        Self(codec::decode(encoded))
    }
}

impl From<BTreeMap<String, String>> for CompositeState {
    fn from(axes: BTreeMap<String, String>) -> Self {
        Self(axes)
    }
}

impl<K, V> FromIterator<(K, V)> for CompositeState
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for CompositeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for CompositeState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::decode(s))
    }
}

/// The current position of a machine.
///
/// Deserializes from either a JSON string (`Simple`) or a JSON object of
/// string values (`Composite`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MachineState {
    Simple(String),
    Composite(CompositeState),
}

impl MachineState {
    /// The token of a simple state.
    pub fn as_simple(&self) -> Option<&str> {
        match self {
            Self::Simple(token) => Some(token),
            Self::Composite(_) => None,
        }
    }

    /// The axes of a composite state.
    pub fn as_composite(&self) -> Option<&CompositeState> {
        match self {
            Self::Simple(_) => None,
            Self::Composite(state) => Some(state),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(token) => f.write_str(token),
            Self::Composite(state) => write!(f, "{state}"),
        }
    }
}

impl From<&str> for MachineState {
    fn from(token: &str) -> Self {
        Self::Simple(token.to_string())
    }
}

impl From<String> for MachineState {
    fn from(token: String) -> Self {
        Self::Simple(token)
    }
}

impl From<CompositeState> for MachineState {
    fn from(state: CompositeState) -> Self {
        Self::Composite(state)
    }
}
