//! Square root tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::warn;

use crate::domains::tools::{ToolDescriptor, ToolError, ToolResult};

/// Parameters for the square root tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SqrtParams {
    /// Number to take the square root of (must be non-negative)
    pub a: f64,
}

/// Square root tool - returns the bare root value.
pub struct SqrtTool;

impl SqrtTool {
    pub const NAME: &'static str = "sqrt";
    pub const DESCRIPTION: &'static str = "Calculate the square root of a number";
    pub const PARAMETERS: &'static [&'static str] = &["a"];

    pub const NEGATIVE_INPUT: &'static str = "Cannot take the square root of a negative number";

    pub fn execute(params: &SqrtParams) -> ToolResult<String> {
        if params.a < 0.0 {
            warn!(a = params.a, "Rejected negative square root");
            return Err(ToolError::domain(Self::NEGATIVE_INPUT));
        }
        Ok(params.a.sqrt().to_string())
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, Self::PARAMETERS, Self::execute)
    }
}
