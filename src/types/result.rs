use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tagged result of a dispatched tool invocation.
///
/// Success payloads and errors travel in separate branches so a caller
/// never has to guess whether a returned value is data or an error string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolOutcome {
    /// Successful invocation with its JSON payload
    #[serde(rename = "ok")]
    Success { data: Value },
    /// Failed invocation with a structured error descriptor
    Error { error: ErrorDetail },
}

/// Caller-visible description of a failed tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code, e.g. `DIVISION_BY_ZERO`
    pub code: String,
    /// Human-readable message an orchestrator can reason over
    pub message: String,
    /// HTTP status from the upstream provider, when one applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Whether retrying the same call could help
    pub retryable: bool,
}

impl ToolOutcome {
    /// Build the error branch from a typed tool error
    pub fn from_error(err: &ToolError) -> Self {
        let status = match err {
            ToolError::UpstreamError { status, .. } => *status,
            _ => None,
        };
        ToolOutcome::Error {
            error: ErrorDetail {
                code: err.error_code().to_string(),
                message: err.to_string(),
                status,
                retryable: err.is_retryable(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    /// The success payload, if any
    pub fn data(&self) -> Option<&Value> {
        match self {
            ToolOutcome::Success { data } => Some(data),
            ToolOutcome::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serializes_with_ok_tag() {
        let outcome = ToolOutcome::Success {
            data: json!({"result": 11}),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"]["result"], 11);
    }

    #[test]
    fn test_error_carries_code_and_upstream_status() {
        let err = ToolError::UpstreamError {
            status: Some(404),
            message: "provider returned status 404 Not Found".to_string(),
        };
        let value = serde_json::to_value(ToolOutcome::from_error(&err)).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], "UPSTREAM_ERROR");
        assert_eq!(value["error"]["status"], 404);
        assert_eq!(value["error"]["retryable"], true);
    }

    #[test]
    fn test_error_omits_absent_status() {
        let value =
            serde_json::to_value(ToolOutcome::from_error(&ToolError::DivisionByZero)).unwrap();
        assert_eq!(value["error"]["code"], "DIVISION_BY_ZERO");
        assert_eq!(value["error"]["retryable"], false);
        assert!(value["error"].get("status").is_none());
    }
}
