pub mod result;

pub use result::ToolOutcome;
