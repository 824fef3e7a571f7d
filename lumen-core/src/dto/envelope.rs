//! Response envelope adapter
//!
//! The testing service is inconsistent about wrapping: some responses carry
//! the payload under a `data` field, others return it at the top level.
//! Everything downstream of the HTTP boundary sees the bare payload.

use serde_json::Value;

/// Field the service nests payloads under
pub const ENVELOPE_FIELD: &str = "data";

/// Returns the payload, unwrapping it from `data` when it is nested there
///
/// Only an object-valued `data` is treated as an envelope, so a payload that
/// happens to have a scalar `data` field is left alone.
pub fn unwrap_payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get(ENVELOPE_FIELD).is_some_and(Value::is_object) => {
            map.remove(ENVELOPE_FIELD).unwrap_or(Value::Null)
        }
        other => other,
    }
}
