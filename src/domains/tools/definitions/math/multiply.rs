//! Multiplication tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::domains::tools::{ToolDescriptor, ToolResult};

/// Parameters for the multiplication tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MultiplyParams {
    /// First number to multiply
    pub a: f64,

    /// Second number to multiply
    pub b: f64,
}

/// Multiplication tool - multiplies two numbers together.
pub struct MultiplyTool;

impl MultiplyTool {
    /// Tool name as registered in the registry.
    pub const NAME: &'static str = "multiply";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Multiply two numbers together";

    pub const PARAMETERS: &'static [&'static str] = &["a", "b"];

    /// Execute the tool logic.
    pub fn execute(params: &MultiplyParams) -> ToolResult<String> {
        let result = params.a * params.b;
        debug!(a = params.a, b = params.b, result, "multiply");
        Ok(format!("{} × {} = {}", params.a, params.b, result))
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, Self::PARAMETERS, Self::execute)
    }
}
