//! Common utilities for MCP tools.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

use crate::api::ApiError;
use crate::spatial::MapError;

/// Error result for tool failures
pub fn tool_error(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

fn with_hint(mut message: String, hint: Option<&str>) -> String {
    if let Some(hint) = hint {
        message.push('\n');
        message.push_str(hint);
    }
    message
}

/// Tool error for a failed Miro call, with an actionable hint when one applies.
pub fn api_failure(action: &str, err: &ApiError) -> CallToolResult {
    warn!("Failed to {}: {}", action, err);
    tool_error(with_hint(
        format!("Error: failed to {}: {}", action, err),
        err.user_hint(),
    ))
}

/// Tool error for a failed spatial-map or aggregation request.
pub fn map_failure(action: &str, err: &MapError) -> CallToolResult {
    warn!("Failed to {}: {}", action, err);
    tool_error(with_hint(
        format!("Error: failed to {}: {}", action, err),
        err.api_error().and_then(ApiError::user_hint),
    ))
}

/// Pretty JSON as text content.
pub fn json_content<T: Serialize + ?Sized>(value: &T) -> Result<Content, CallToolResult> {
    serde_json::to_string_pretty(value)
        .map(Content::text)
        .map_err(|e| tool_error(format!("Error: failed to serialize result: {}", e)))
}

/// Success result with a one-line summary followed by a JSON body.
pub fn summary_with_json<T: Serialize + ?Sized>(summary: impl Into<String>, value: &T) -> CallToolResult {
    match json_content(value) {
        Ok(json) => CallToolResult::success(vec![Content::text(summary.into()), json]),
        Err(err) => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(result: &CallToolResult, index: usize) -> String {
        result.content[index]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_api_failure_includes_hint() {
        let err = ApiError::Status {
            status: 404,
            url: "https://api.miro.com/v2/boards/x".to_string(),
            body: "{}".to_string(),
        };
        let result = api_failure("get board", &err);
        assert_eq!(result.is_error, Some(true));
        let text = text_of(&result, 0);
        assert!(text.starts_with("Error: failed to get board"));
        assert!(text.contains("does not exist"));
    }

    #[test]
    fn test_map_failure_without_hint() {
        let result = map_failure("build map", &MapError::InvalidGridDensity(99));
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result, 0).contains("grid density 99"));
    }

    #[test]
    fn test_summary_with_json() {
        let result = summary_with_json("2 things", &serde_json::json!({"a": 1}));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.content.len(), 2);
        assert_eq!(text_of(&result, 0), "2 things");
        assert!(text_of(&result, 1).contains("\"a\": 1"));
    }
}
