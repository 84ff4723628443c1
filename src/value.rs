//! The immutable configuration tree consumed by this crate.
//!
//! A [`ConfigValue`] is one node of an already-parsed HOCON document: a
//! scalar, an ordered array, or an insertion-ordered object. Trees are built
//! by an upstream provider (a HOCON parser, or programmatically) and are
//! never mutated by the cursor, the emitter, or the reconciler.
//!
//! Every node carries an [`Origin`], an opaque descriptor of where the value
//! came from. Origins are diagnostics only: they never participate in
//! equality.
//!
//! ## Examples
//!
//! ```rust
//! use serde_hocon::{ConfigObject, ConfigValue};
//!
//! let mut obj = ConfigObject::new();
//! obj.insert("enabled".to_string(), ConfigValue::from(true));
//! obj.insert("retries".to_string(), ConfigValue::from(3));
//! let root = ConfigValue::from(obj);
//!
//! assert!(root.is_object());
//! assert_eq!(
//!     root.as_object().and_then(|o| o.get("retries")).and_then(|v| v.as_i64()),
//!     Some(3),
//! );
//! ```

use crate::ConfigObject;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Where a configuration value came from.
///
/// Opaque to the core: it is threaded through for error messages and is never
/// used for data identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    description: String,
    line: Option<usize>,
}

impl Origin {
    /// Creates an origin with a source description and optional line number.
    pub fn new(description: impl Into<String>, line: Option<usize>) -> Self {
        Origin {
            description: description.into(),
            line,
        }
    }

    /// Origin for values built in memory rather than read from a document.
    #[must_use]
    pub fn synthetic() -> Self {
        Origin {
            description: "synthetic".to_string(),
            line: None,
        }
    }

    /// The source description, e.g. a file name.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The line number within the source, if known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}: {}", self.description, line),
            None => f.write_str(&self.description),
        }
    }
}

impl Default for Origin {
    fn default() -> Self {
        Origin::synthetic()
    }
}

/// A numeric scalar, preserving the int/float distinction of the source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Converts to `i64` if the value is an integer or a whole float in range.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts to `f64`; always succeeds.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

/// The shape of a [`ConfigValue`].
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ValueKind {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<ConfigValue>),
    Object(ConfigObject),
}

impl ValueKind {
    /// Short shape name for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool(_) => "boolean",
            ValueKind::Number(_) => "number",
            ValueKind::String(_) => "string",
            ValueKind::Array(_) => "array",
            ValueKind::Object(_) => "object",
        }
    }
}

/// One immutable node of a configuration tree.
///
/// The shape lives in [`ConfigValue::kind`]; the attached [`Origin`] is
/// carried alongside for diagnostics. Equality compares kinds only, so two
/// structurally equal trees from different sources compare equal.
#[derive(Clone, Debug, Default)]
pub struct ConfigValue {
    pub kind: ValueKind,
    origin: Origin,
}

impl ConfigValue {
    /// Creates a value with an explicit origin.
    pub fn new(kind: ValueKind, origin: Origin) -> Self {
        ConfigValue { kind, origin }
    }

    /// Creates a value with a synthetic origin.
    pub fn synthetic(kind: ValueKind) -> Self {
        ConfigValue {
            kind,
            origin: Origin::synthetic(),
        }
    }

    /// Replaces the origin, keeping the kind.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// The origin descriptor of this node.
    #[must_use]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self.kind, ValueKind::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self.kind, ValueKind::Object(_))
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is an integer-compatible number, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match &self.kind {
            ValueKind::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to its elements.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match &self.kind {
            ValueKind::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ConfigObject> {
        match &self.kind {
            ValueKind::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short shape name for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

// Origins are diagnostics only; structural equality ignores them.
impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::synthetic(ValueKind::Bool(value))
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::synthetic(ValueKind::Number(Number::Integer(value as i64)))
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::synthetic(ValueKind::Number(Number::Integer(value)))
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::synthetic(ValueKind::Number(Number::Integer(value as i64)))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::synthetic(ValueKind::Number(Number::Float(value)))
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::synthetic(ValueKind::String(value.to_string()))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::synthetic(ValueKind::String(value))
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        ConfigValue::synthetic(ValueKind::Array(value))
    }
}

impl From<ConfigObject> for ConfigValue {
    fn from(value: ConfigObject) -> Self {
        ConfigValue::synthetic(ValueKind::Object(value))
    }
}

impl Serialize for ConfigValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.kind {
            ValueKind::Null => serializer.serialize_unit(),
            ValueKind::Bool(b) => serializer.serialize_bool(*b),
            ValueKind::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            ValueKind::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            ValueKind::String(s) => serializer.serialize_str(s),
            ValueKind::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            ValueKind::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
