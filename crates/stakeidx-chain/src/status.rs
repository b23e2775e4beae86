//! Network status lookups.

use serde_json::Value;

/// Status endpoint of the metachain (highest shard id).
pub const PATH_NODE_STATUS_META: &str = "/network/status/4294967295";

/// Location of the current epoch inside the status payload.
pub const EPOCH_FIELD_PATH: &str = "status.erd_epoch_number";

/// Follows a dotted path (`a.b.0.c`) through a JSON value.
///
/// Numeric segments index into arrays.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => current.get(segment),
    })
}

/// Renders a looked-up value as text; a missing value or `null` is empty.
pub fn value_as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Current epoch from a status payload, or an empty string if absent.
pub fn extract_epoch(data: &Value) -> String {
    let epoch = value_as_text(lookup_path(data, EPOCH_FIELD_PATH));
    if epoch.is_empty() {
        tracing::warn!("Status payload has no {}", EPOCH_FIELD_PATH);
    }
    epoch
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_epoch_number() {
        let data = json!({"status": {"erd_epoch_number": 1234, "erd_nonce": 99}});
        assert_eq!(extract_epoch(&data), "1234");
    }

    #[test]
    fn test_extract_epoch_string() {
        let data = json!({"status": {"erd_epoch_number": "17"}});
        assert_eq!(extract_epoch(&data), "17");
    }

    #[test]
    fn test_missing_epoch_is_empty() {
        assert_eq!(extract_epoch(&json!({"status": {}})), "");
        assert_eq!(extract_epoch(&json!({})), "");
        assert_eq!(extract_epoch(&Value::Null), "");
        assert_eq!(extract_epoch(&json!({"status": {"erd_epoch_number": null}})), "");
    }

    #[test]
    fn test_lookup_path_arrays() {
        let data = json!({"a": [{"b": true}, {"b": false}]});
        assert_eq!(value_as_text(lookup_path(&data, "a.1.b")), "false");
        assert!(lookup_path(&data, "a.x.b").is_none());
        assert!(lookup_path(&data, "a.5").is_none());
    }

    #[test]
    fn test_lookup_path_object_rendering() {
        let data = json!({"a": {"b": {"c": 1}}});
        assert_eq!(value_as_text(lookup_path(&data, "a.b")), r#"{"c":1}"#);
    }
}
