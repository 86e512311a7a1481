//! Tool contract and the built-in tools

pub mod calculator;
pub mod function_factory;
pub mod tool;
pub mod weather;

pub use calculator::CalculatorTool;
pub use function_factory::FunctionFactory;
pub use tool::{Tool, ToolRegistry};
pub use weather::WeatherTool;
