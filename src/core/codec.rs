//! Canonical string form for composite states.
//!
//! A composite state is written as `key:value` pairs joined by `|`, with keys
//! in lexicographic order. The empty mapping and the empty string are each
//! other's encoding.
//!
//! Axis names and values must not contain `|` or `:`; see [`is_encodable`].
//! `MachineBuilder::build` rejects composite machines that break this rule.

use std::collections::BTreeMap;

/// Separates `key:value` pairs.
pub const PAIR_SEPARATOR: char = '|';

/// Separates a key from its value.
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Whether `token` can be used as an axis name or value.
///
/// Only tokens without separators survive `decode(encode(..))` unchanged.
///
/// ```rust
/// use statecraft::core::codec::is_encodable;
///
/// assert!(is_encodable("one"));
/// assert!(!is_encodable("one|b:two"));
/// ```
pub fn is_encodable(token: &str) -> bool {
    !token.contains(|c| c == PAIR_SEPARATOR || c == KEY_VALUE_SEPARATOR)
}

/// Encode an axis mapping into its canonical string.
///
/// # Example
///
/// ```rust
/// use statecraft::core::codec::encode;
/// use std::collections::BTreeMap;
///
/// let mut axes = BTreeMap::new();
/// axes.insert("b".to_string(), "bar".to_string());
/// axes.insert("a".to_string(), "foo".to_string());
///
/// assert_eq!(encode(&axes), "a:foo|b:bar");
/// assert_eq!(encode(&BTreeMap::new()), "");
/// ```
pub fn encode(axes: &BTreeMap<String, String>) -> String {
    let mut encoded = String::new();
    for (i, (key, value)) in axes.iter().enumerate() {
        if i > 0 {
            encoded.push(PAIR_SEPARATOR);
        }
        encoded.push_str(key);
        encoded.push(KEY_VALUE_SEPARATOR);
        encoded.push_str(value);
    }
    encoded
}

/// Decode a canonical string into an axis mapping.
///
/// Only the first `:` of a pair splits key from value. A pair with no `:`
/// becomes a key with an empty value. Empty segments are skipped, so the
/// empty string decodes to the empty mapping.
///
/// # Example
///
/// ```rust
/// use statecraft::core::codec::decode;
///
/// let axes = decode("b:bar|a:foo");
/// let keys: Vec<_> = axes.keys().cloned().collect();
/// assert_eq!(keys, vec!["a", "b"]);
/// assert!(decode("").is_empty());
/// ```
pub fn decode(encoded: &str) -> BTreeMap<String, String> {
    encoded
        .split(PAIR_SEPARATOR)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once(KEY_VALUE_SEPARATOR) {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}
