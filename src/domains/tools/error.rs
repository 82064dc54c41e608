//! Tool-specific error types.

use thiserror::Error;

/// Result type for registry and tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during tool registration or execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// A tool with this name is already registered.
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    /// The requested tool was not found.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Arguments do not match the tool's parameter list.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool's mathematical precondition was violated.
    #[error("{0}")]
    Domain(String),
}

impl ToolError {
    /// Create a new "duplicate name" error.
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    /// Create a new "unknown operation" error.
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new domain error.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ToolError::unknown_operation("pow").to_string(),
            "Unknown operation: pow"
        );
        assert_eq!(
            ToolError::invalid_arguments("missing parameter 'b'").to_string(),
            "Invalid arguments: missing parameter 'b'"
        );
        assert_eq!(
            ToolError::domain("Cannot divide by zero").to_string(),
            "Cannot divide by zero"
        );
    }
}
