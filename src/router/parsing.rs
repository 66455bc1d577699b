use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ComposeError;

/// Decode a raw bus payload, naming `what` in the error.
///
/// # Errors
///
/// Returns `ParseError` if `payload` is not valid JSON for `T`.
pub fn decode<T: DeserializeOwned>(payload: &str, what: &str) -> Result<T, ComposeError> {
    serde_json::from_str(payload)
        .map_err(|e| ComposeError::ParseError(format!("Invalid {what} payload: {e}")))
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn v_array<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    v_path(root, path).and_then(|v| v.as_array())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v_str_walks_nested_objects() {
        let payload = json!({ "state": { "values": { "b": { "f": { "selected_option": { "value": "web" } } } } } });
        assert_eq!(
            v_str(&payload, &["state", "values", "b", "f", "selected_option", "value"]),
            Some("web")
        );
        assert_eq!(v_str(&payload, &["state", "values", "missing"]), None);
    }

    #[test]
    fn test_v_str_rejects_non_strings() {
        let payload = json!({ "message": { "ts": 12 } });
        assert_eq!(v_str(&payload, &["message", "ts"]), None);
    }

    #[test]
    fn test_decode_names_the_payload_kind() {
        let err = decode::<Value>("{not json", "reaction").unwrap_err();
        assert!(err.to_string().contains("Invalid reaction payload"));
    }
}
