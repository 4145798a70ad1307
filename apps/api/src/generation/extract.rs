//! Structured-text extraction for model output that is supposed to be a JSON object.
//!
//! Models wrap JSON in code fences, prepend "Here is the analysis:" and so on.
//! `extract` peels that off and never fails: anything that still will not decode
//! comes back as `{"raw": <original text>}`.

use serde_json::{Map, Value};

/// A decoded JSON object.
pub type Record = Map<String, Value>;

/// Reserved key of the fallback record.
pub const RAW_KEY: &str = "raw";

pub fn extract(raw_text: &str) -> Record {
    try_extract(raw_text).unwrap_or_else(|| raw_record(raw_text))
}

/// Like `extract`, but `None` when the text holds no decodable object.
///
/// Callers that must tell a genuine `{"raw": ...}` object apart from the
/// fallback use this instead.
pub fn try_extract(raw_text: &str) -> Option<Record> {
    let unfenced = strip_fences(raw_text.trim());
    let candidate = outermost_object(&unfenced).unwrap_or(unfenced.as_str());

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(record)) => Some(record),
        _ => None,
    }
}

fn raw_record(text: &str) -> Record {
    let mut record = Record::new();
    record.insert(RAW_KEY.to_string(), Value::String(text.to_string()));
    record
}

/// Drops an opening fence line (with or without a language tag) and a matching
/// closing fence line.
fn strip_fences(text: &str) -> String {
    if !text.starts_with("```") {
        return text.to_string();
    }

    let mut lines: Vec<&str> = text.lines().skip(1).collect();
    if lines
        .last()
        .is_some_and(|line| line.trim_start().starts_with("```"))
    {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
