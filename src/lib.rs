//! tiny-tools-rs: lightweight, type-safe tools for LLM tool calling
//!
//! This library provides two stateless, schema-described tools — a live
//! weather lookup and an arithmetic expression evaluator — behind a uniform
//! [`Tool`] trait, plus the registry and dispatch layer an external
//! orchestrator needs to invoke them and receive either a structured result
//! or a typed error.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tiny_tools_rs::{CalculatorTool, FunctionFactory, WeatherTool};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut factory = FunctionFactory::new();
//!     factory.register_tool(CalculatorTool::new());
//!     factory.register_tool(WeatherTool::new());
//!
//!     let outcome = factory
//!         .dispatch("calculate", json!({"expression": "2 + 3 * (4 - 1)"}))
//!         .await;
//!     println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
//! }
//! ```

pub mod error;
pub mod tools;
pub mod types;

pub use error::{Result, ToolError};
pub use tools::{CalculatorTool, FunctionFactory, Tool, ToolRegistry, WeatherTool};
pub use types::result::ErrorDetail;
pub use types::ToolOutcome;
