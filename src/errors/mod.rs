mod gateway_error;
mod mcp_error;
mod tool_error;

pub use gateway_error::{ErrorCategory, GatewayError};
pub use mcp_error::{ErrorCode, McpError};
pub use tool_error::{ToolError, ToolErrorKind};
