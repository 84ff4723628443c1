//! Deserialization of Rust data structures from [`ConfigValue`] trees.
//!
//! [`ValueDeserializer`] walks a configuration tree and feeds it to serde
//! visitors. Its distinctive behavior lives in the sequence path: when a
//! sequence is requested but the node is an object, the object is assumed to
//! be an integer-keyed spelling of an array (typically produced by per-index
//! overrides) and is run through the
//! [reconciler](crate::reconcile::reconcile) before element conversion. A
//! failure converting any reconciled element aborts the whole pass and names
//! the source key it came from.
//!
//! [`DeserializeOptions`] controls the remaining binding decisions:
//!
//! - `null_policy`: what a null element inside a sequence means (drop it,
//!   fail, or substitute the element type's placeholder value);
//! - `unwrap_single`: treat a bare scalar as a one-element sequence where a
//!   sequence is expected;
//! - `merge_objects`: deep-merge duplicate reconciliation indices instead of
//!   replacing.
//!
//! Values are produced through transient visitor calls, so targets must own
//! their data (`String` rather than `&str`).

use serde::de::{self, DeserializeSeed, Visitor};

use crate::error::{Error, Result};
use crate::reconcile::{reconcile, NullPolicy};
use crate::value::{ConfigValue, Number, ValueKind};

/// Binding-layer knobs for converting trees into Rust values.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeserializeOptions {
    pub null_policy: NullPolicy,
    /// Treat a bare scalar as a one-element sequence where a sequence is
    /// expected.
    pub unwrap_single: bool,
    /// Deep-merge object values at duplicate reconciliation indices.
    pub merge_objects: bool,
}

impl DeserializeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    #[must_use]
    pub fn with_unwrap_single(mut self, on: bool) -> Self {
        self.unwrap_single = on;
        self
    }

    #[must_use]
    pub fn with_merge_objects(mut self, on: bool) -> Self {
        self.merge_objects = on;
        self
    }
}

/// serde `Deserializer` over a configuration tree node.
pub struct ValueDeserializer<'a> {
    value: &'a ConfigValue,
    options: DeserializeOptions,
    path: String,
}

impl<'a> ValueDeserializer<'a> {
    pub fn new(value: &'a ConfigValue) -> Self {
        Self::with_options(value, DeserializeOptions::default())
    }

    pub fn with_options(value: &'a ConfigValue, options: DeserializeOptions) -> Self {
        ValueDeserializer {
            value,
            options,
            path: String::new(),
        }
    }

    fn at(value: &'a ConfigValue, options: DeserializeOptions, path: String) -> Self {
        ValueDeserializer {
            value,
            options,
            path,
        }
    }

    fn shape_error(&self, expected: &str) -> Error {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        Error::unexpected_shape(path, expected, self.value.type_name())
    }

    /// A null is substitutable in a scalar position only under
    /// [`NullPolicy::Substitute`].
    fn substitute_null(&self) -> bool {
        self.value.is_null() && self.options.null_policy == NullPolicy::Substitute
    }
}

macro_rules! deserialize_integer {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            if self.substitute_null() {
                return visitor.$visit(0);
            }
            match &self.value.kind {
                ValueKind::Number(Number::Integer(n)) => visitor.visit_i64(*n),
                _ => Err(self.shape_error("integer")),
            }
        }
    };
}

impl<'de, 'a> de::Deserializer<'de> for ValueDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match &self.value.kind {
            ValueKind::Null => visitor.visit_unit(),
            ValueKind::Bool(b) => visitor.visit_bool(*b),
            ValueKind::Number(Number::Integer(n)) => visitor.visit_i64(*n),
            ValueKind::Number(Number::Float(f)) => visitor.visit_f64(*f),
            ValueKind::String(s) => visitor.visit_str(s),
            ValueKind::Array(items) => {
                visitor.visit_seq(ArrayAccess::new(items, self.options, &self.path))
            }
            ValueKind::Object(obj) => {
                visitor.visit_map(ObjectAccess::new(obj.iter(), self.options, &self.path))
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.substitute_null() {
            return visitor.visit_bool(false);
        }
        match &self.value.kind {
            ValueKind::Bool(b) => visitor.visit_bool(*b),
            _ => Err(self.shape_error("boolean")),
        }
    }

    deserialize_integer!(deserialize_i8, visit_i8, i8);
    deserialize_integer!(deserialize_i16, visit_i16, i16);
    deserialize_integer!(deserialize_i32, visit_i32, i32);
    deserialize_integer!(deserialize_i64, visit_i64, i64);
    deserialize_integer!(deserialize_u8, visit_u8, u8);
    deserialize_integer!(deserialize_u16, visit_u16, u16);
    deserialize_integer!(deserialize_u32, visit_u32, u32);
    deserialize_integer!(deserialize_u64, visit_u64, u64);

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.substitute_null() {
            return visitor.visit_f64(0.0);
        }
        match &self.value.kind {
            ValueKind::Number(Number::Integer(n)) => visitor.visit_f64(*n as f64),
            ValueKind::Number(Number::Float(f)) => visitor.visit_f64(*f),
            _ => Err(self.shape_error("number")),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match &self.value.kind {
            ValueKind::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(self.shape_error("single-character string")),
                }
            }
            _ => Err(self.shape_error("string")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.substitute_null() {
            return visitor.visit_str("");
        }
        match &self.value.kind {
            ValueKind::String(s) => visitor.visit_str(s),
            _ => Err(self.shape_error("string")),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine;

        match &self.value.kind {
            ValueKind::String(s) => {
                let bytes = BASE64
                    .decode(s)
                    .map_err(|e| Error::custom(format!("invalid base64 string: {}", e)))?;
                visitor.visit_byte_buf(bytes)
            }
            ValueKind::Array(items) => {
                let mut bytes = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    bytes.push(byte_element(item, &i.to_string())?);
                }
                visitor.visit_byte_buf(bytes)
            }
            ValueKind::Object(obj) => {
                let elements = reconcile(
                    obj.iter().map(|(k, v)| (k.as_str(), v)),
                    self.options.null_policy,
                    self.options.merge_objects,
                )?;
                let mut bytes = Vec::with_capacity(elements.len());
                for (key, value) in &elements {
                    bytes.push(byte_element(value, key)?);
                }
                visitor.visit_byte_buf(bytes)
            }
            _ => Err(self.shape_error("byte array")),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.value.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.value.is_null() {
            visitor.visit_unit()
        } else {
            Err(self.shape_error("null"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match &self.value.kind {
            ValueKind::Array(items) => {
                visitor.visit_seq(ArrayAccess::new(items, self.options, &self.path))
            }
            ValueKind::Object(obj) => {
                let elements = reconcile(
                    obj.iter().map(|(k, v)| (k.as_str(), v)),
                    self.options.null_policy,
                    self.options.merge_objects,
                )?;
                visitor.visit_seq(ReconciledAccess::new(elements, self.options, &self.path))
            }
            ValueKind::Null => Err(self.shape_error("array")),
            _ if self.options.unwrap_single => {
                visitor.visit_seq(SingleAccess::new(self.value, self.options, &self.path))
            }
            _ => Err(self.shape_error("array")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match &self.value.kind {
            ValueKind::Object(obj) => {
                visitor.visit_map(ObjectAccess::new(obj.iter(), self.options, &self.path))
            }
            _ => Err(self.shape_error("object")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match &self.value.kind {
            ValueKind::String(variant) => visitor.visit_enum(EnumAccess {
                variant: variant.as_str(),
                value: None,
                options: self.options,
                path: self.path,
            }),
            ValueKind::Object(obj) => {
                let mut iter = obj.iter();
                match (iter.next(), iter.next()) {
                    (Some((variant, value)), None) => visitor.visit_enum(EnumAccess {
                        variant: variant.as_str(),
                        value: Some(value),
                        options: self.options,
                        path: self.path,
                    }),
                    _ => Err(self.shape_error("single-entry object")),
                }
            }
            _ => Err(self.shape_error("string or single-entry object")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }
}

fn byte_element(value: &ConfigValue, key: &str) -> Result<u8> {
    // Nulls survive reconciliation only under the substitute policy.
    if value.is_null() {
        return Ok(0);
    }
    match &value.kind {
        ValueKind::Number(Number::Integer(n)) => u8::try_from(*n)
            .map_err(|_| Error::conversion(key, format!("{} out of range for a byte", n))),
        _ => Err(Error::conversion(
            key,
            format!("expected integer, found {}", value.type_name()),
        )),
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

struct ArrayAccess<'a> {
    iter: std::slice::Iter<'a, ConfigValue>,
    index: usize,
    options: DeserializeOptions,
    path: &'a str,
}

impl<'a> ArrayAccess<'a> {
    fn new(items: &'a [ConfigValue], options: DeserializeOptions, path: &'a str) -> Self {
        ArrayAccess {
            iter: items.iter(),
            index: 0,
            options,
            path,
        }
    }
}

impl<'de, 'a> de::SeqAccess<'de> for ArrayAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        let Some(value) = self.iter.next() else {
            return Ok(None);
        };
        let path = format!("{}[{}]", self.path, self.index);
        self.index += 1;
        seed.deserialize(ValueDeserializer::at(value, self.options, path))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Sequence access over reconciled elements. Ownership note: reconciliation
/// may synthesize merged values, so elements are owned here and borrowed per
/// call, which is why the deserializer does not promise `'de` borrows.
struct ReconciledAccess<'a> {
    elements: std::vec::IntoIter<(String, ConfigValue)>,
    options: DeserializeOptions,
    path: &'a str,
}

impl<'a> ReconciledAccess<'a> {
    fn new(
        elements: Vec<(String, ConfigValue)>,
        options: DeserializeOptions,
        path: &'a str,
    ) -> Self {
        ReconciledAccess {
            elements: elements.into_iter(),
            options,
            path,
        }
    }
}

impl<'de, 'a> de::SeqAccess<'de> for ReconciledAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.elements.next() else {
            return Ok(None);
        };
        let path = child_path(self.path, &key);
        seed.deserialize(ValueDeserializer::at(&value, self.options, path))
            .map(Some)
            .map_err(|e| match e {
                conv @ Error::Conversion { .. } => conv,
                other => Error::conversion(&key, other),
            })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.elements.len())
    }
}

/// One-element sequence wrapping a bare scalar (unwrap-single mode).
struct SingleAccess<'a> {
    value: Option<&'a ConfigValue>,
    options: DeserializeOptions,
    path: &'a str,
}

impl<'a> SingleAccess<'a> {
    fn new(value: &'a ConfigValue, options: DeserializeOptions, path: &'a str) -> Self {
        SingleAccess {
            value: Some(value),
            options,
            path,
        }
    }
}

impl<'de, 'a> de::SeqAccess<'de> for SingleAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        let Some(value) = self.value.take() else {
            return Ok(None);
        };
        seed.deserialize(ValueDeserializer::at(
            value,
            self.options,
            self.path.to_string(),
        ))
        .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(usize::from(self.value.is_some()))
    }
}

struct ObjectAccess<'a> {
    iter: indexmap::map::Iter<'a, String, ConfigValue>,
    entry: Option<(&'a str, &'a ConfigValue)>,
    options: DeserializeOptions,
    path: &'a str,
}

impl<'a> ObjectAccess<'a> {
    fn new(
        iter: indexmap::map::Iter<'a, String, ConfigValue>,
        options: DeserializeOptions,
        path: &'a str,
    ) -> Self {
        ObjectAccess {
            iter,
            entry: None,
            options,
            path,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for ObjectAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.entry = Some((key.as_str(), value));
        seed.deserialize(KeyDeserializer { key: key.as_str() }).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let (key, value) = self
            .entry
            .take()
            .ok_or_else(|| Error::invalid_state("value requested before key"))?;
        seed.deserialize(ValueDeserializer::at(
            value,
            self.options,
            child_path(self.path, key),
        ))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Deserializer for object keys. Keys are always stored as strings; numeric
/// key types (as in `BTreeMap<u32, _>`) parse the string form.
struct KeyDeserializer<'a> {
    key: &'a str,
}

macro_rules! parse_key {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            match self.key.parse::<$ty>() {
                Ok(n) => visitor.$visit(n),
                Err(_) => Err(Error::custom(format!(
                    "object key `{}` is not a valid {}",
                    self.key,
                    stringify!($ty)
                ))),
            }
        }
    };
}

impl<'de, 'a> de::Deserializer<'de> for KeyDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str(self.key)
    }

    parse_key!(deserialize_i8, visit_i8, i8);
    parse_key!(deserialize_i16, visit_i16, i16);
    parse_key!(deserialize_i32, visit_i32, i32);
    parse_key!(deserialize_i64, visit_i64, i64);
    parse_key!(deserialize_u8, visit_u8, u8);
    parse_key!(deserialize_u16, visit_u16, u16);
    parse_key!(deserialize_u32, visit_u32, u32);
    parse_key!(deserialize_u64, visit_u64, u64);
    parse_key!(deserialize_f32, visit_f32, f32);
    parse_key!(deserialize_f64, visit_f64, f64);
    parse_key!(deserialize_bool, visit_bool, bool);

    serde::forward_to_deserialize_any! {
        char str string bytes byte_buf option unit unit_struct newtype_struct
        seq tuple tuple_struct map struct enum identifier ignored_any
    }
}

struct EnumAccess<'a> {
    variant: &'a str,
    value: Option<&'a ConfigValue>,
    options: DeserializeOptions,
    path: String,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumAccess<'a> {
    type Error = Error;
    type Variant = VariantAccess<'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(KeyDeserializer { key: self.variant })?;
        Ok((
            variant,
            VariantAccess {
                value: self.value,
                options: self.options,
                path: child_path(&self.path, self.variant),
            },
        ))
    }
}

struct VariantAccess<'a> {
    value: Option<&'a ConfigValue>,
    options: DeserializeOptions,
    path: String,
}

impl<'a> VariantAccess<'a> {
    fn inner(self, expected: &str) -> Result<ValueDeserializer<'a>> {
        match self.value {
            Some(value) => Ok(ValueDeserializer::at(value, self.options, self.path)),
            None => Err(Error::unexpected_shape(&self.path, expected, "nothing")),
        }
    }
}

impl<'de, 'a> de::VariantAccess<'de> for VariantAccess<'a> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(value) if value.is_null() => Ok(()),
            Some(value) => Err(Error::unexpected_shape(
                &self.path,
                "unit variant",
                value.type_name(),
            )),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self.inner("newtype variant value")?)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self.inner("tuple variant value")?, visitor)
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self.inner("struct variant value")?, visitor)
    }
}
