//! Response envelopes from the dealership backend
//!
//! Every endpoint answers `{ "status": <code>, <key>: ..., "message"?: ... }`.
//! Models receive the whole envelope and pick out their own key, so a
//! transport failure, a non-200 status and a malformed body all reach them
//! through the same door.

use crate::error::ApiError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// What a request produced: a parsed JSON body, or why there is none
pub type Payload = Result<Value, ApiError>;

/// Status value the backend uses for success
pub const STATUS_OK: u64 = 200;

/// Read the `status` field of a body, accepting `200` or `"200"`
pub fn status_of(body: &Value) -> Option<u64> {
    let status = body.get("status")?;
    status
        .as_u64()
        .or_else(|| status.as_str().and_then(|s| s.trim().parse().ok()))
}

/// True when the payload parsed and reports success
pub fn is_success(payload: &Payload) -> bool {
    matches!(payload, Ok(body) if status_of(body) == Some(STATUS_OK))
}

/// The value under `key` of a successful envelope
///
/// Returns `None` for failed requests, non-200 envelopes, and envelopes
/// that lack the key (or carry `null` there).
pub fn success_field<'a>(payload: &'a Payload, key: &str) -> Option<&'a Value> {
    match payload {
        Ok(body) if status_of(body) == Some(STATUS_OK) => body.get(key).filter(|v| !v.is_null()),
        _ => None,
    }
}

/// The server-provided `message`, if any
pub fn message_of(payload: &Payload) -> Option<String> {
    payload
        .as_ref()
        .ok()
        .and_then(|body| body.get("message"))
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

/// Short human-readable reason a payload was not usable
pub fn failure_reason(payload: &Payload) -> String {
    match payload {
        Err(err) => err.to_string(),
        Ok(body) => {
            if let Some(message) = message_of(payload) {
                return message;
            }
            match status_of(body) {
                Some(STATUS_OK) => "unexpected response shape".to_string(),
                Some(status) => format!("status {}", status),
                None => "response has no status".to_string(),
            }
        }
    }
}

/// Deserialize a field the backend sends as either a string or a number
///
/// `null` and missing values become an empty string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

/// Deserialize a flag the backend may send as bool, number, string or null
///
/// Anything that is not clearly true is false.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

/// Deserialize an optional text label; non-string values count as absent
pub fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Deserialize a numeric id, falling back to 0 when absent or unreadable
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_id(deserializer)?.unwrap_or(0))
}

/// Deserialize an optional numeric id sent as a number or a numeric string
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_accepts_number_or_string() {
        assert_eq!(status_of(&json!({"status": 200})), Some(200));
        assert_eq!(status_of(&json!({"status": "404"})), Some(404));
        assert_eq!(status_of(&json!({"status": "Authenticated"})), None);
        assert_eq!(status_of(&json!({})), None);
    }

    #[test]
    fn test_success_field_requires_ok_status() {
        let ok: Payload = Ok(json!({"status": 200, "reviews": []}));
        let failed: Payload = Ok(json!({"status": 500, "reviews": []}));
        let null: Payload = Ok(json!({"status": 200, "reviews": null}));

        assert_eq!(success_field(&ok, "reviews"), Some(&json!([])));
        assert!(success_field(&failed, "reviews").is_none());
        assert!(success_field(&null, "reviews").is_none());
        assert!(success_field(&Err(ApiError::Timeout), "reviews").is_none());
    }

    #[test]
    fn test_failure_reason_prefers_server_message() {
        let payload: Payload = Ok(json!({"status": 403, "message": "Login required"}));
        assert_eq!(failure_reason(&payload), "Login required");

        let payload: Payload = Ok(json!({"status": 500}));
        assert_eq!(failure_reason(&payload), "status 500");

        let payload: Payload = Err(ApiError::Timeout);
        assert_eq!(failure_reason(&payload), "request timed out");
    }

    #[test]
    fn test_lenient_string() {
        #[derive(Deserialize)]
        struct Sample {
            #[serde(default, deserialize_with = "lenient_string")]
            zip: String,
        }

        let p: Sample = serde_json::from_value(json!({"zip": 12345})).unwrap();
        assert_eq!(p.zip, "12345");
        let p: Sample = serde_json::from_value(json!({"zip": "02134"})).unwrap();
        assert_eq!(p.zip, "02134");
        let p: Sample = serde_json::from_value(json!({"zip": null})).unwrap();
        assert_eq!(p.zip, "");
        let p: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.zip, "");
    }

    #[test]
    fn test_lenient_flags_and_labels() {
        #[derive(Deserialize)]
        struct Sample {
            #[serde(default, deserialize_with = "lenient_bool")]
            flag: bool,
            #[serde(default, deserialize_with = "lenient_label")]
            label: Option<String>,
            #[serde(default, deserialize_with = "lenient_id")]
            id: Option<u64>,
        }

        let p: Sample = serde_json::from_value(json!({"flag": null, "label": 3, "id": "42"})).unwrap();
        assert!(!p.flag);
        assert_eq!(p.label, None);
        assert_eq!(p.id, Some(42));

        let p: Sample = serde_json::from_value(json!({"flag": "true", "label": "positive", "id": 7})).unwrap();
        assert!(p.flag);
        assert_eq!(p.label.as_deref(), Some("positive"));
        assert_eq!(p.id, Some(7));

        let p: Sample = serde_json::from_value(json!({"id": "n/a"})).unwrap();
        assert!(!p.flag);
        assert_eq!(p.id, None);
    }
}
