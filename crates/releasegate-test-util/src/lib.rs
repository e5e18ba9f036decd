//! Shared test utilities for the releasegate workspace.
//!
//! `xtask` needs `normalize_nondeterministic` at runtime, so this lives in
//! its own crate rather than behind `#[cfg(test)]`.

use serde_json::Value;

const TIMESTAMP_KEYS: [&str; 4] = ["createdAt", "evaluatedAt", "signedAt", "updatedAt"];

/// Normalize non-deterministic JSON fields for golden comparison.
///
/// 1. **Root-only**: `caseId` is replaced with `"__CASE_ID__"` when the root
///    object is an approval packet (has `schema`, `caseId`, `revisionId` and
///    `revisionHistory`). Nested objects with a `caseId` are left alone.
///
/// 2. **Recursive**: timestamp keys become `"__TIMESTAMP__"` and
///    `revisionId` becomes `"__REVISION_ID__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_packet = obj.contains_key("schema")
            && obj.contains_key("caseId")
            && obj.contains_key("revisionId")
            && obj.contains_key("revisionHistory");
        if is_packet {
            obj.insert(
                "caseId".to_string(),
                Value::String("__CASE_ID__".to_string()),
            );
        }
    }
    normalize_recursive(&mut value);
    value
}

fn normalize_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            if map.contains_key("revisionId") {
                map.insert(
                    "revisionId".to_string(),
                    Value::String("__REVISION_ID__".to_string()),
                );
            }
            for val in map.values_mut() {
                normalize_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_recursive(val);
            }
        }
        _ => {}
    }
}
