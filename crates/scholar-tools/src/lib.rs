//! Tool-call contract between an agent runtime and the tools it hosts.

pub mod executor;
pub mod registry;

pub use executor::{ToolCall, ToolError, ToolExecutor, ToolOutput, deserialize_params};
pub use registry::ToolDef;
