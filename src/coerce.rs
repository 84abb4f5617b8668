//! Best-effort extraction of strict JSON payloads from model output.
//!
//! Generative models routinely wrap valid JSON in prose or markdown fences
//! despite explicit instructions. The coercer is lenient about the wrapping
//! and strict about the inner payload: no partial-JSON repair, no tolerance
//! beyond what `serde_json` accepts.

use serde_json::{Map, Value};

/// Coerce raw model text into a JSON array.
///
/// Stages: trim; unwrap the first fenced code block if present; if the text
/// is not already a bare array, slice between the first `[` and last `]`;
/// strict parse. Returns `None` on any failure.
pub fn coerce_to_array(raw: &str) -> Option<Vec<Value>> {
    match extract_payload(raw, '[', ']')? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Coerce raw model text into an array of JSON objects.
///
/// Non-object elements are dropped; the caller decides whether a shorter
/// array is acceptable.
pub fn coerce_to_object_array(raw: &str) -> Option<Vec<Map<String, Value>>> {
    let items = coerce_to_array(raw)?;
    Some(
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
    )
}

/// Coerce raw model text into a single JSON object.
pub fn coerce_to_object(raw: &str) -> Option<Map<String, Value>> {
    match extract_payload(raw, '{', '}')? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn extract_payload(raw: &str, open: char, close: char) -> Option<Value> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let text = strip_fences(text);

    let candidate = if text.starts_with(open) && text.ends_with(close) {
        text
    } else {
        let start = text.find(open)?;
        let end = text.rfind(close)?;
        if end <= start {
            return None;
        }
        text[start..=end].trim()
    };

    serde_json::from_str(candidate).ok()
}

/// Return the content of the first fenced code block, tolerating an optional
/// language tag after the opening fence. Text without a complete fence pair
/// is returned unchanged.
fn strip_fences(text: &str) -> &str {
    let Some(start) = text.find("```") else {
        return text;
    };
    let after_fence = &text[start + 3..];
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => text,
    }
}
