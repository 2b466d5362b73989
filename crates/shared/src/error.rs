use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure body returned by the backend.
///
/// The refresh endpoint reports `{ok, message, error}` while FastAPI's own
/// validation and HTTP errors use `{detail}`, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Most specific human-readable text in the body: `error`, then
    /// `message`, then `detail`.
    pub fn best_message(&self) -> Option<String> {
        non_blank(self.error.as_deref())
            .or_else(|| non_blank(self.message.as_deref()))
            .or_else(|| self.detail.as_ref().and_then(detail_text))
    }
}

/// Pulls a readable message out of a raw error response body.
///
/// Non-JSON bodies are returned verbatim when they are short plain text.
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.best_message();
    }
    let text = std::str::from_utf8(body).ok()?.trim();
    if text.is_empty() || text.len() > 512 || text.starts_with('<') {
        return None;
    }
    Some(text.to_string())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::String(text) => non_blank(Some(text)),
        // FastAPI validation errors: [{"loc": [...], "msg": "...", ...}]
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_error_over_message() {
        let body = br#"{"ok":false,"message":"refresh failed","error":"ingest timeout"}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("ingest timeout"));
    }

    #[test]
    fn falls_back_to_message_then_detail() {
        assert_eq!(
            extract_error_message(br#"{"message":"Scrape failed","error":"  "}"#).as_deref(),
            Some("Scrape failed")
        );
        assert_eq!(
            extract_error_message(br#"{"detail":"Not Found"}"#).as_deref(),
            Some("Not Found")
        );
    }

    #[test]
    fn joins_validation_detail_messages() {
        let body = br#"{"detail":[{"loc":["body","note"],"msg":"field required"},{"msg":"too short"}]}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("field required; too short")
        );
    }

    #[test]
    fn ignores_html_and_empty_bodies() {
        assert_eq!(extract_error_message(b""), None);
        assert_eq!(extract_error_message(b"<html>502</html>"), None);
        assert_eq!(
            extract_error_message(b"Internal Server Error").as_deref(),
            Some("Internal Server Error")
        );
    }
}
