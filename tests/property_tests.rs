//! Property-based tests for emission, quoting, and reconciliation.
//!
//! The crate has no HOCON parser, so round trips are checked against JSON:
//! with default options the emitter's output is valid JSON, and
//! `serde_json` acts as the independent reader.

use proptest::prelude::*;
use serde_hocon::{
    emit_value, reconcile, to_string, ConfigObject, ConfigValue, EmitOptions, NullPolicy,
};

/// Strategy for arbitrary configuration trees. Floats are kept finite;
/// HOCON has no spelling for NaN or infinity.
fn tree_strategy() -> impl Strategy<Value = ConfigValue> {
    let leaf = prop_oneof![
        Just(ConfigValue::synthetic(serde_hocon::ValueKind::Null)),
        any::<bool>().prop_map(ConfigValue::from),
        any::<i64>().prop_map(ConfigValue::from),
        prop::num::f64::NORMAL.prop_map(ConfigValue::from),
        ".*".prop_map(|s: String| ConfigValue::from(s)),
    ];
    leaf.prop_recursive(4, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(ConfigValue::from),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..8).prop_map(|entries| {
                let mut obj = ConfigObject::new();
                for (key, value) in entries {
                    obj.insert(key, value);
                }
                obj.into()
            }),
        ]
    })
}

/// Mirrors a configuration tree as a `serde_json::Value` for comparison.
fn to_json(value: &ConfigValue) -> serde_json::Value {
    use serde_hocon::{Number, ValueKind};
    match &value.kind {
        ValueKind::Null => serde_json::Value::Null,
        ValueKind::Bool(b) => serde_json::json!(b),
        ValueKind::Number(Number::Integer(n)) => serde_json::json!(n),
        ValueKind::Number(Number::Float(f)) => serde_json::json!(f),
        ValueKind::String(s) => serde_json::json!(s),
        ValueKind::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        ValueKind::Object(obj) => serde_json::Value::Object(
            obj.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
        ),
    }
}

proptest! {
    /// Default options produce JSON; an independent JSON parser must read
    /// back the same structure.
    #[test]
    fn prop_default_output_is_json(tree in tree_strategy()) {
        let text = emit_value(&tree, &EmitOptions::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(parsed, to_json(&tree));
    }

    /// Every string value, however hostile, survives quoting: the quoted
    /// form is a valid JSON string spelling the original.
    #[test]
    fn prop_quoting_round_trips(s in ".*") {
        let text = to_string(&s).unwrap();
        let back: String = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(back, s);
    }

    /// A string the emitter leaves unquoted is written verbatim and obeys
    /// the conservative character rules.
    #[test]
    fn prop_unquoted_strings_are_safe(s in ".*") {
        let options = EmitOptions::new().with_unquote_strings_if_possible(true);
        let mut emitter = serde_hocon::Emitter::new(options);
        emitter.write_str(&s).unwrap();
        let text = emitter.into_inner();
        if !text.starts_with('"') {
            prop_assert_eq!(&text, &s);
            prop_assert!(!s.is_empty());
            let first = s.chars().next().unwrap();
            prop_assert!(!first.is_numeric() && first != '-');
            prop_assert!(s.chars().all(|c| c.is_alphabetic() || c.is_numeric() || c == '-'));
            prop_assert!(!s.contains("//"));
            for keyword in ["true", "false", "null", "include"] {
                prop_assert!(!s.starts_with(keyword));
            }
        }
    }

    /// Reconciliation sorts by numeric index no matter the entry order.
    #[test]
    fn prop_reconcile_orders_by_index(indices in prop::collection::hash_set(0u32..1000, 0..32)) {
        let entries: Vec<(String, ConfigValue)> = indices
            .iter()
            .map(|&i| (i.to_string(), ConfigValue::from(i64::from(i))))
            .collect();
        let out = reconcile(
            entries.iter().map(|(k, v)| (k.as_str(), v)),
            NullPolicy::Skip,
            false,
        )
        .unwrap();
        prop_assert_eq!(out.len(), indices.len());
        let values: Vec<i64> = out.iter().map(|(_, v)| v.as_i64().unwrap()).collect();
        let mut sorted = values.clone();
        sorted.sort_unstable();
        prop_assert_eq!(values, sorted);
    }

    /// Non-numeric keys never contribute elements.
    #[test]
    fn prop_reconcile_ignores_non_numeric_keys(
        keys in prop::collection::vec("[a-z]{1,8}", 0..16),
    ) {
        let entries: Vec<(String, ConfigValue)> = keys
            .into_iter()
            .map(|k| (k, ConfigValue::from(1i64)))
            .collect();
        let out = reconcile(
            entries.iter().map(|(k, v)| (k.as_str(), v)),
            NullPolicy::Skip,
            false,
        )
        .unwrap();
        prop_assert!(out.is_empty());
    }
}
