//! Extract a JSON object from free-form LLM output
//!
//! Models occasionally wrap the payload in prose or markdown code fences.
//! Scanning for the first `{` and the last `}` recovers the object in the
//! large majority of such replies without a grammar-constrained decoder.

use fundwire_domain::ExtractedFields;

/// Find and parse the JSON object embedded in `reply`.
///
/// Returns a human-readable reason on failure; the caller turns that into
/// one repair attempt.
pub(crate) fn parse_reply(reply: &str) -> Result<ExtractedFields, String> {
    let start = reply
        .find('{')
        .ok_or_else(|| "no JSON object found in reply".to_string())?;
    let end = reply
        .rfind('}')
        .ok_or_else(|| "no closing brace found in reply".to_string())?;

    if end < start {
        return Err("braces out of order in reply".to_string());
    }

    let candidate = &reply[start..=end];
    let value: serde_json::Value = serde_json::from_str(candidate)
        .map_err(|e| format!("JSON parse error: {}", e))?;

    match value {
        serde_json::Value::Object(fields) => Ok(fields),
        other => Err(format!(
            "top-level JSON value is {}, expected an object",
            type_name(&other)
        )),
    }
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
