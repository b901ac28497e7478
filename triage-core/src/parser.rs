//! Extracts a JSON object from free-form model output.
//!
//! Layers, first hit wins:
//! 1. a ```` ```json ```` fenced block: the text between its first `{` and last `}`
//! 2. the first flat `{...}` substring (no nested braces outside strings)
//! 3. nothing → `None`

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

static FENCED_JSON: OnceLock<Option<Regex>> = OnceLock::new();
static FLAT_OBJECT: OnceLock<Option<Regex>> = OnceLock::new();

fn fenced_json() -> Option<&'static Regex> {
    FENCED_JSON
        .get_or_init(|| Regex::new(r"(?is)```json\s*(.*?)(?:```|\z)").ok())
        .as_ref()
}

fn flat_object() -> Option<&'static Regex> {
    FLAT_OBJECT
        .get_or_init(|| Regex::new(r#"(?s)\{(?:[^{}"]|"(?:[^"\\]|\\.)*")*\}"#).ok())
        .as_ref()
}

/// Returns the first JSON object found in `raw`, or `None`.
pub fn parse_structured(raw: &str) -> Option<Map<String, Value>> {
    if let Some(obj) = from_fence(raw) {
        return Some(obj);
    }

    let candidate = flat_object()?.find(raw)?;
    match serde_json::from_str::<Value>(candidate.as_str()) {
        Ok(Value::Object(m)) => Some(m),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "brace-delimited text is not valid JSON");
            None
        }
    }
}

fn from_fence(raw: &str) -> Option<Map<String, Value>> {
    let body = fenced_json()?.captures(raw)?.get(1)?.as_str();
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&body[start..=end]) {
        Ok(Value::Object(m)) => Some(m),
        _ => {
            debug!("fenced block did not hold a JSON object; trying bare braces");
            None
        }
    }
}
