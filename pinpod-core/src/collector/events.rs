//! Event wire format for the collection endpoint
//!
//! One JSON object per request:
//!
//! ```text
//! {"event": "scroll_depth", "timestamp": "2025-01-01T10:00:00.000Z",
//!  "sessionId": "session_1735725600000_k3j9x0abc", "depth": 25}
//! ```
//!
//! Payload attributes are spread into the top level after the envelope
//! keys, so a payload key named `event`, `timestamp` or `sessionId`
//! replaces the envelope value.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::types::Event;

/// ISO-8601 UTC with millisecond precision and a `Z` suffix
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the JSON body posted for one event
pub fn wire_body(event: &Event) -> Value {
    let mut body = Map::new();
    body.insert("event".to_string(), Value::String(event.name().to_string()));
    body.insert(
        "timestamp".to_string(),
        Value::String(format_timestamp(event.timestamp())),
    );
    body.insert(
        "sessionId".to_string(),
        Value::String(event.session_id().to_string()),
    );

    for (key, value) in event.payload() {
        body.insert(key.clone(), value.clone());
    }

    Value::Object(body)
}
