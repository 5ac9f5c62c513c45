//! Tools exposed to other agents in the host.

mod cc_call;
mod error;
mod tool;

pub use cc_call::CcCallTool;
pub use error::ToolError;
pub use tool::{SharedTool, Tool, ToolResult};
