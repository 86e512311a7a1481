use super::{tool::ToolRegistry, Tool};
use crate::types::ToolOutcome;
use crate::{Result, ToolError};
use serde_json::Value;
use tracing::{debug, warn};

/// Factory for creating and managing function/tool execution
#[derive(Debug, Default)]
pub struct FunctionFactory {
    registry: ToolRegistry,
}

impl FunctionFactory {
    /// Create a new function factory
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
        }
    }

    /// Register a tool with the factory
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.registry.register(tool);
    }

    /// Execute a function call by name, returning the typed result
    pub async fn execute_function(&self, function_name: &str, parameters: Value) -> Result<Value> {
        let tool = self
            .registry
            .get(function_name)
            .ok_or_else(|| ToolError::ToolNotFound(function_name.to_string()))?;

        debug!(tool = function_name, "executing tool");
        tool.execute(parameters).await
    }

    /// Execute a function call and fold any failure into a tagged outcome.
    ///
    /// This is the boundary an orchestrator talks to: it never panics and
    /// never lets an error escape as an unhandled fault, so the caller can
    /// feed either branch back into its reasoning loop.
    pub async fn dispatch(&self, function_name: &str, parameters: Value) -> ToolOutcome {
        match self.execute_function(function_name, parameters).await {
            Ok(data) => ToolOutcome::Success { data },
            Err(err) => {
                warn!(tool = function_name, error = %err, "tool call failed");
                ToolOutcome::from_error(&err)
            }
        }
    }

    /// Get all available tools for OpenAI function calling
    pub fn get_openai_tools(&self) -> Vec<Value> {
        self.registry.to_openai_tools()
    }

    /// Check if a function exists
    pub fn has_function(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }
}
