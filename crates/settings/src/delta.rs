//! Recursive merge/diff over `ron::Value` maps.

use ron::value::{Map as RonMap, Value as RonValue};
use serde::{Serialize, de::DeserializeOwned};

use crate::SettingsError;

/// Serialize a section model into its `ron::Value` map form.
pub(crate) fn to_map<T: Serialize>(value: &T) -> Result<RonMap, SettingsError> {
    let text = ron::to_string(value)?;
    match ron::from_str::<RonValue>(&text)? {
        RonValue::Map(map) => Ok(map),
        _ => Err(SettingsError::Invalid("section must serialize to a map")),
    }
}

pub(crate) fn from_value<T: DeserializeOwned>(value: &RonValue) -> Result<T, SettingsError> {
    Ok(value.clone().into_rust::<T>()?)
}

/// Overlay `delta` onto `base`; nested maps merge, everything else replaces.
pub(crate) fn merge(base: &RonMap, delta: &RonMap) -> RonMap {
    let mut merged = base.clone();
    for (key, overlay) in delta.iter() {
        let next = match (merged.get(key), overlay) {
            (Some(RonValue::Map(inner)), RonValue::Map(inner_delta)) => {
                RonValue::Map(merge(inner, inner_delta))
            }
            _ => overlay.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Keys of `current` whose value differs from `defaults` (recursively).
pub(crate) fn diff(current: &RonMap, defaults: &RonMap) -> RonMap {
    let mut out = RonMap::new();
    for (key, value) in current.iter() {
        match (defaults.get(key), value) {
            (Some(RonValue::Map(def_inner)), RonValue::Map(inner)) => {
                let nested = diff(inner, def_inner);
                if !nested.is_empty() {
                    out.insert(key.clone(), RonValue::Map(nested));
                }
            }
            (Some(default), _) if default == value => {}
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}
