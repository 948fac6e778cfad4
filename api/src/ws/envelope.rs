use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};

/// Topic name for a session's live feed.
pub fn session_topic(session_id: i64) -> String {
    format!("attendance:session:{session_id}")
}

/// Wraps `payload` in the frame every server message uses:
/// `{"event", "topic", "payload", "ts"}`.
pub fn frame<T: Serialize>(event: &str, topic: &str, payload: &T) -> String {
    json!({
        "event": event,
        "topic": topic,
        "payload": payload,
        "ts": Utc::now().to_rfc3339(),
    })
    .to_string()
}

/// Application-level keepalive: `{"type":"ping"}`.
pub fn is_app_ping(raw: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(raw),
        Ok(Value::Object(map)) if map.get("type").and_then(Value::as_str) == Some("ping")
    )
}
