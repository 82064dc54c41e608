use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::tools::{ToolDescriptor, ToolError, ToolResult};

/// Parameters for the integer conversion tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ToIntegerParams {
    /// Number to convert
    pub a: f64,
}

/// Integer conversion tool - truncates toward zero.
pub struct ToIntegerTool;

impl ToIntegerTool {
    pub const NAME: &'static str = "to_integer";
    pub const DESCRIPTION: &'static str = "Convert a number to an integer";
    pub const PARAMETERS: &'static [&'static str] = &["a"];

    pub fn execute(params: &ToIntegerParams) -> ToolResult<String> {
        if !params.a.is_finite() {
            return Err(ToolError::domain(format!(
                "Cannot convert {} to an integer",
                params.a
            )));
        }
        // trunc keeps the sign of zero; -0.7 must render as "0".
        let truncated = params.a.trunc() + 0.0;
        Ok(truncated.to_string())
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, Self::PARAMETERS, Self::execute)
    }
}
