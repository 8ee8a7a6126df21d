//! Canonical JSON and SHA-256
//!
//! Every JSON artifact is written with recursively sorted keys so two runs
//! over the same sources produce byte-identical files. Keys that are plain
//! unsigned integers (card ids) sort numerically and before any other key.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::cmp::Ordering;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Serializable value with every object's keys sorted.
pub fn canonical_value<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    let v = serde_json::to_value(value)?;
    Ok(sort_value(&v))
}

/// Compact canonical form (sorted keys, no whitespace).
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&canonical_value(value)?)
}

/// Sorted keys, two-space indentation, trailing newline.
pub fn canonical_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(&canonical_value(value)?)?;
    out.push('\n');
    Ok(out)
}

fn key_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| key_order(a.0, b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Unordered {
        zeta: u8,
        alpha: u8,
    }

    #[test]
    fn struct_fields_come_out_sorted() {
        let out = canonical_json(&Unordered { zeta: 1, alpha: 2 }).unwrap();
        assert_eq!(out, r#"{"alpha":2,"zeta":1}"#);
    }

    #[test]
    fn nested_objects_sorted_arrays_kept() {
        let obj = json!({"z": [3, 1, 2], "a": {"m": 1, "b": 2}});
        assert_eq!(
            canonical_json(&obj).unwrap(),
            r#"{"a":{"b":2,"m":1},"z":[3,1,2]}"#
        );
    }

    #[test]
    fn integer_keys_sort_numerically() {
        let obj = json!({"10": 0, "title": 0, "2": 0, "1": 0, "02": 0});
        assert_eq!(
            canonical_json(&obj).unwrap(),
            r#"{"1":0,"02":0,"2":0,"10":0,"title":0}"#
        );
    }

    #[test]
    fn pretty_form_uses_two_spaces() {
        let out = canonical_pretty(&json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(out, "{\n  \"a\": 2,\n  \"b\": 1\n}\n");
    }

    #[test]
    fn hash_deterministic() {
        assert_eq!(sha256_hex(b"test data"), sha256_hex(b"test data"));
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
