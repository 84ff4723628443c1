//! Coercion of integer-keyed objects into ordered sequences.
//!
//! Configuration files routinely spell arrays as objects whose keys are
//! decimal indices (`{"0": a, "2": b}`), usually as the result of overriding
//! individual elements via dotted paths. The reconciler collapses such an
//! object back into a sequence: numeric keys are collected into a sparse
//! index map (a `BTreeMap<u32, _>`), then drained in ascending order. Gaps
//! compact away; `{"0": a, "7": b}` yields a two-element sequence.
//!
//! Keys that do not parse as a base-10 `u32` (including negative ones) are
//! skipped silently; they are not part of the sequence being described. Null
//! elements are governed by [`NullPolicy`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::{ConfigObject, ConfigValue, Error, Result, ValueKind};

/// What to do with a null element encountered during reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NullPolicy {
    /// Drop the element; later elements shift down. The default.
    #[default]
    Skip,
    /// Abort the whole reconciliation with an error naming the index.
    Fail,
    /// Keep the null; downstream conversion substitutes the element type's
    /// placeholder (zero, `false`, the empty string).
    Substitute,
}

/// Reconciles integer-keyed entries into a sequence, ascending by index.
///
/// Each element is returned together with its source key so that a failure
/// converting it downstream can name the entry it came from. Entries are
/// processed independently; a null under [`NullPolicy::Skip`] drops that
/// element only, never the remainder of the pass.
///
/// A duplicate index replaces the earlier value, unless both values are
/// objects and `merge_objects` is set, in which case they are deep-merged
/// field by field (the later value wins on scalar conflicts).
pub fn reconcile<'a, I>(
    entries: I,
    policy: NullPolicy,
    merge_objects: bool,
) -> Result<Vec<(String, ConfigValue)>>
where
    I: IntoIterator<Item = (&'a str, &'a ConfigValue)>,
{
    let mut slots: BTreeMap<u32, (String, ConfigValue)> = BTreeMap::new();
    for (key, value) in entries {
        let index: u32 = match key.parse() {
            Ok(index) => index,
            Err(_) => continue,
        };
        if value.is_null() {
            match policy {
                NullPolicy::Skip => continue,
                NullPolicy::Fail => return Err(Error::NullElement { index }),
                NullPolicy::Substitute => {}
            }
        }
        match slots.entry(index) {
            Entry::Vacant(slot) => {
                slot.insert((key.to_string(), value.clone()));
            }
            Entry::Occupied(mut slot) => {
                let replacement = if merge_objects {
                    deep_merge(&slot.get().1, value)
                } else {
                    value.clone()
                };
                slot.insert((key.to_string(), replacement));
            }
        }
    }
    Ok(slots.into_values().collect())
}

/// Update/merge mode: reconciled elements are appended after the elements
/// already present. Index keys order the new elements among themselves but
/// never overwrite existing ones.
pub fn reconcile_into<'a, I>(
    mut existing: Vec<ConfigValue>,
    entries: I,
    policy: NullPolicy,
    merge_objects: bool,
) -> Result<Vec<ConfigValue>>
where
    I: IntoIterator<Item = (&'a str, &'a ConfigValue)>,
{
    let reconciled = reconcile(entries, policy, merge_objects)?;
    existing.extend(reconciled.into_iter().map(|(_, value)| value));
    Ok(existing)
}

/// Field-by-field merge of two values. Objects recurse; anything else is
/// replaced by `overlay`.
fn deep_merge(base: &ConfigValue, overlay: &ConfigValue) -> ConfigValue {
    match (&base.kind, &overlay.kind) {
        (ValueKind::Object(old), ValueKind::Object(new)) => {
            let mut merged = ConfigObject::with_capacity(old.len() + new.len());
            for (key, value) in old.iter() {
                merged.insert(key.clone(), value.clone());
            }
            for (key, value) in new.iter() {
                let combined = match merged.get(key) {
                    Some(previous) => deep_merge(previous, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), combined);
            }
            ConfigValue::new(ValueKind::Object(merged), overlay.origin().clone())
        }
        _ => overlay.clone(),
    }
}
