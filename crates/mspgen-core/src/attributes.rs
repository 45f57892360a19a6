//! # Attribute Encoding
//!
//! User entities may carry free-form attributes that end up embedded in the
//! issued certificate. The topology declares them as a YAML mapping with mixed
//! scalar values; at load time they are normalized to an ordered list of
//! string pairs, preserving declaration order.
//!
//! The CA provider receives them as an opaque payload:
//!
//! ```text
//! {"attrs":{"role":"approver","level":"2"}}
//! ```
//!
//! Values are stringified but not escaped. An embedded double quote is passed
//! through verbatim and the payload is then no longer valid JSON.

use serde_yaml::{Mapping, Value};

use crate::error::TopologyError;

/// Ordered, normalized attribute pairs for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    pairs: Vec<(String, String)>,
}

impl AttributeList {
    /// An empty list (entities without attributes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-normalized pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Normalize a YAML mapping, keeping its declared order.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NonScalarAttribute`] when a key or value is a
    /// sequence, mapping, or tagged value.
    pub fn from_mapping(context: &str, mapping: &Mapping) -> Result<Self, TopologyError> {
        let mut pairs = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key_str = scalar_to_string(key).ok_or_else(|| TopologyError::NonScalarAttribute {
                context: context.to_string(),
                key: format!("{key:?}"),
            })?;
            let value_str =
                scalar_to_string(value).ok_or_else(|| TopologyError::NonScalarAttribute {
                    context: context.to_string(),
                    key: key_str.clone(),
                })?;
            pairs.push((key_str, value_str));
        }
        Ok(Self { pairs })
    }

    /// The normalized pairs in declaration order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Comma-joined `"key":"value"` pairs.
    pub fn encode(&self) -> String {
        encode_pairs(&self.pairs)
    }

    /// The full payload handed to intermediate-CA issuance.
    pub fn payload(&self) -> String {
        wrap_payload(&self.encode())
    }
}

/// Encode pairs as `"k1":"v1","k2":"v2"`.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("\"{k}\":\"{v}\""))
        .collect::<Vec<_>>()
        .join(",")
}

/// Wrap an encoded pair list into the fixed `{"attrs":{...}}` template.
pub fn wrap_payload(encoded: &str) -> String {
    format!("{{\"attrs\":{{{encoded}}}}}")
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}
