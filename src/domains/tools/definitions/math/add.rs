//! Addition tool definition.
//!
//! A tool that adds two numbers and renders the computation as text.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domains::tools::{ToolDescriptor, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the addition tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddParams {
    /// First number to add
    pub a: f64,

    /// Second number to add
    pub b: f64,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Addition tool - adds two numbers together.
pub struct AddTool;

impl AddTool {
    /// Tool name as registered in the registry.
    pub const NAME: &'static str = "add";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Add two numbers together";

    /// Parameter names in call order.
    pub const PARAMETERS: &'static [&'static str] = &["a", "b"];

    /// Execute the tool logic.
    #[instrument(skip_all, fields(a = params.a, b = params.b))]
    pub fn execute(params: &AddParams) -> ToolResult<String> {
        let result = params.a + params.b;
        debug!(result, "add");
        Ok(format!("{} + {} = {}", params.a, params.b, result))
    }

    /// Create the registry descriptor for this tool.
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, Self::PARAMETERS, Self::execute)
    }
}

// ============================================================================
// Tests
// ============================================================================
