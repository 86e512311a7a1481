use thiserror::Error;

/// Main error type for tool invocations
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Weather provider unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("Weather provider error: {message}")]
    UpstreamError {
        /// HTTP status returned by the provider, if the response got that far
        status: Option<u16>,
        message: String,
    },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ToolError>;

impl ToolError {
    /// Check if retrying the call from the caller's side could help.
    ///
    /// Tools never retry internally; this is a hint for the orchestrator.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ToolError::UpstreamUnavailable(_) | ToolError::UpstreamError { .. }
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ToolError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ToolError::InvalidExpression(_) => "INVALID_EXPRESSION",
            ToolError::DivisionByZero => "DIVISION_BY_ZERO",
            ToolError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            ToolError::UpstreamError { .. } => "UPSTREAM_ERROR",
            ToolError::ToolNotFound(_) => "TOOL_NOT_FOUND",
            ToolError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        let mut error = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "retryable": self.is_retryable()
        });
        if let ToolError::UpstreamError {
            status: Some(code), ..
        } = self
        {
            error["status"] = serde_json::json!(code);
        }
        serde_json::json!({ "error": error })
    }
}
