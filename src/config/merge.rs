//! Configuration merge logic
//!
//! Layers are JSON values folded in precedence order:
//! - Objects: deep-merge by key
//! - Arrays and scalars: last layer wins

use serde_json::Value;

/// Deep merge two JSON values.
///
/// Objects merge recursively by key; for anything else (arrays, scalars,
/// null) the overlay replaces the base.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let value = match merged.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay,
    }
}

/// Merge multiple config layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}
