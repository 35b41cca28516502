//! Generic response tree.
//!
//! FogBugz replies carry no schema the client can rely on, so every response
//! is decoded into a [`Value`] and callers pick out the fields they need.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::Serialize;

/// Key under which text mixed into an element with attributes or children
/// is stored.
pub const CONTENT_KEY: &str = "__content__";

static NULL: Value = Value::Null;

/// A decoded XML node.
///
/// # Example
///
/// ```
/// use fogbugz::Value;
///
/// let tree = fogbugz::parse_response(
///     "<response><cases count=\"1\"><case ixBug=\"7\"><sTitle>Crash</sTitle></case></cases></response>",
/// ).unwrap();
///
/// assert_eq!(tree["cases"]["count"].as_i64(), Some(1));
/// assert_eq!(tree["cases"]["case"]["sTitle"].as_str(), Some("Crash"));
/// assert!(tree["missing"].is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An empty element.
    Null,
    /// Element text.
    String(String),
    /// Element text declared numeric through a `type` attribute.
    Number(f64),
    /// Repeated sibling elements sharing a name.
    Sequence(Vec<Value>),
    /// Attributes and child elements by name.
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    /// Look up a key in a mapping. Returns `None` for any other variant.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Borrow the text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as an integer.
    ///
    /// Numeric strings are accepted as well, since FogBugz rarely declares
    /// element types.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret the value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// View the value as a list.
    ///
    /// A single child element decodes to a plain value rather than a
    /// sequence, so non-sequence values are returned as a one-element slice.
    /// `Null` yields an empty slice.
    pub fn as_sequence(&self) -> &[Value] {
        match self {
            Self::Sequence(items) => items,
            Self::Null => &[],
            other => std::slice::from_ref(other),
        }
    }

    /// Borrow the entries of a mapping.
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render scalars as display text. Containers render as JSON.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Missing keys and non-mapping values index to `Null`.
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}
