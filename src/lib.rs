//! # serde_hocon
//!
//! Serde-based emission and binding for HOCON (Human-Optimized Config Object
//! Notation) configuration trees.
//!
//! This crate covers the write side of HOCON plus tree-to-Rust binding. It
//! does not parse HOCON text; configuration trees arrive as [`ConfigValue`]
//! (built programmatically or converted from another source) and leave as
//! HOCON text or as typed Rust values.
//!
//! ## What's inside
//!
//! - **Traversal**: [`TreeCursor`] flattens a tree into a JSON-like token
//!   stream (`StartObject`, `FieldName`, scalars, ...) with constant-time
//!   [`skip_children`](TreeCursor::skip_children).
//! - **Emission**: [`Emitter`] renders a token stream as text, with
//!   [`EmitOptions`] controlling HOCON's syntactic freedoms: unquoted
//!   strings, omitted root braces, `key {}` object entries, `=` separators,
//!   pretty-printing.
//! - **Reconciliation**: [`reconcile`](reconcile::reconcile) coerces
//!   integer-keyed objects (`{"0": a, "2": b}`, typically produced by
//!   per-index overrides) back into ordered sequences.
//! - **Binding**: serde `Serializer` and `Deserializer` implementations tie
//!   it together, so plain `#[derive]`d types serialize to HOCON text and
//!   deserialize from configuration trees.
//!
//! ## Quick start
//!
//! ```rust
//! use serde::Serialize;
//! use serde_hocon::EmitOptions;
//!
//! #[derive(Serialize)]
//! struct Database {
//!     host: String,
//!     port: u16,
//!     replicas: Vec<String>,
//! }
//!
//! let db = Database {
//!     host: "db.internal".to_string(),
//!     port: 5432,
//!     replicas: vec!["r1".to_string(), "r2".to_string()],
//! };
//!
//! // JSON-compatible output by default.
//! let compact = serde_hocon::to_string(&db).unwrap();
//! assert_eq!(
//!     compact,
//!     r#"{"host":"db.internal","port":5432,"replicas":["r1","r2"]}"#
//! );
//!
//! // Idiomatic HOCON with `EmitOptions::hocon()`.
//! let hocon = serde_hocon::to_string_with_options(&db, EmitOptions::hocon()).unwrap();
//! assert_eq!(hocon, "host: \"db.internal\"\nport: 5432\nreplicas: [r1, r2]");
//! ```
//!
//! ## Binding a tree
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_hocon::{ConfigObject, ConfigValue};
//!
//! #[derive(Deserialize)]
//! struct Settings {
//!     name: String,
//!     ports: Vec<u16>,
//! }
//!
//! let mut ports = ConfigObject::new();
//! // Sparse integer keys, as produced by `ports.0 = 80` style overrides.
//! ports.insert("1".to_string(), ConfigValue::from(8080i64));
//! ports.insert("0".to_string(), ConfigValue::from(80i64));
//!
//! let mut root = ConfigObject::new();
//! root.insert("name".to_string(), ConfigValue::from("web"));
//! root.insert("ports".to_string(), ports.into());
//!
//! let settings: Settings = serde_hocon::from_value(&root.into()).unwrap();
//! assert_eq!(settings.ports, vec![80, 8080]);
//! ```

pub mod cursor;
pub mod de;
pub mod emit;
pub mod error;
pub mod map;
pub mod reconcile;
pub mod ser;
pub mod token;
pub mod value;

pub use cursor::TreeCursor;
pub use de::{DeserializeOptions, ValueDeserializer};
pub use emit::{EmitOptions, Emitter};
pub use error::{Error, Result};
pub use map::ConfigObject;
pub use reconcile::{reconcile, reconcile_into, NullPolicy};
pub use ser::Serializer;
pub use token::Token;
pub use value::{ConfigValue, Number, Origin, ValueKind};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes a value to compact, JSON-compatible HOCON text.
///
/// # Examples
///
/// ```rust
/// let text = serde_hocon::to_string(&vec![1, 2, 3]).unwrap();
/// assert_eq!(text, "[1,2,3]");
/// ```
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: Serialize,
{
    to_string_with_options(value, EmitOptions::default())
}

/// Serializes a value to pretty-printed text with the default separators.
///
/// For idiomatic HOCON (unquoted strings, no root braces), use
/// [`to_string_with_options`] with [`EmitOptions::hocon`].
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: Serialize,
{
    to_string_with_options(value, EmitOptions::default().with_pretty(true))
}

/// Serializes a value to HOCON text with explicit options.
///
/// # Examples
///
/// ```rust
/// use serde_hocon::EmitOptions;
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("enabled", true);
///
/// let text = serde_hocon::to_string_with_options(&map, EmitOptions::hocon()).unwrap();
/// assert_eq!(text, "enabled: true");
/// ```
pub fn to_string_with_options<T>(value: &T, options: EmitOptions) -> Result<String>
where
    T: Serialize,
{
    let mut serializer = Serializer::new(options);
    value.serialize(&mut serializer)?;
    serializer.finish()
}

/// Serializes a value as HOCON text into an
/// [`io::Write`](std::io::Write).
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: std::io::Write,
    T: Serialize,
{
    to_writer_with_options(writer, value, EmitOptions::default())
}

/// Serializes a value into a writer with explicit options.
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: EmitOptions) -> Result<()>
where
    W: std::io::Write,
    T: Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Deserializes a typed value from a configuration tree with default
/// binding options.
pub fn from_value<T>(value: &ConfigValue) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value_with_options(value, DeserializeOptions::default())
}

/// Deserializes a typed value from a configuration tree.
///
/// # Examples
///
/// ```rust
/// use serde_hocon::{ConfigValue, DeserializeOptions};
///
/// // A bare scalar binds to a one-element Vec under unwrap-single.
/// let options = DeserializeOptions::new().with_unwrap_single(true);
/// let ports: Vec<u16> = serde_hocon::from_value_with_options(
///     &ConfigValue::from(8080i64),
///     options,
/// )
/// .unwrap();
/// assert_eq!(ports, vec![8080]);
/// ```
pub fn from_value_with_options<T>(value: &ConfigValue, options: DeserializeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::with_options(value, options))
}

/// Renders a configuration tree as HOCON text by driving a [`TreeCursor`]
/// into an [`Emitter`] token for token.
///
/// # Examples
///
/// ```rust
/// use serde_hocon::{ConfigObject, ConfigValue, EmitOptions};
///
/// let mut root = ConfigObject::new();
/// root.insert("name".to_string(), ConfigValue::from("web"));
///
/// let text = serde_hocon::emit_value(&root.into(), &EmitOptions::hocon()).unwrap();
/// assert_eq!(text, "name: web");
/// ```
pub fn emit_value(value: &ConfigValue, options: &EmitOptions) -> Result<String> {
    let mut cursor = TreeCursor::new(value);
    let mut emitter = Emitter::new(options.clone());
    while let Some(token) = cursor.next_token() {
        emitter.write_token(&token)?;
    }
    emitter.finish()
}
