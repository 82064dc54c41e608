//! Subtraction tool definition.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::tools::{ToolDescriptor, ToolResult};

/// Parameters for the subtraction tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SubtractParams {
    /// Number to subtract from
    pub a: f64,

    /// Number to subtract
    pub b: f64,
}

/// Subtraction tool - subtracts the second number from the first.
pub struct SubtractTool;

impl SubtractTool {
    pub const NAME: &'static str = "subtract";
    pub const DESCRIPTION: &'static str = "Subtract the second number from the first";
    pub const PARAMETERS: &'static [&'static str] = &["a", "b"];

    pub fn execute(params: &SubtractParams) -> ToolResult<String> {
        Ok(format!(
            "{} - {} = {}",
            params.a,
            params.b,
            params.a - params.b
        ))
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, Self::PARAMETERS, Self::execute)
    }
}
