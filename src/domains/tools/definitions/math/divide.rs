//! Division tool definition.
//!
//! Division is one of the two tools with a domain precondition: a zero
//! divisor is reported as a domain error rather than producing `inf`/`NaN`.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::domains::tools::{ToolDescriptor, ToolError, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the division tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DivideParams {
    /// Number to be divided (numerator)
    pub a: f64,

    /// Number to divide by (denominator)
    pub b: f64,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Division tool - divides the first number by the second.
pub struct DivideTool;

impl DivideTool {
    /// Tool name as registered in the registry.
    pub const NAME: &'static str = "divide";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Divide the first number by the second";

    /// Parameter names in call order.
    pub const PARAMETERS: &'static [&'static str] = &["a", "b"];

    /// Message of the zero-divisor domain error.
    pub const DIVIDE_BY_ZERO: &'static str = "Cannot divide by zero";

    /// Execute the tool logic.
    ///
    /// Fails with a domain error when `b` is zero (either sign).
    #[instrument(skip_all, fields(a = params.a, b = params.b))]
    pub fn execute(params: &DivideParams) -> ToolResult<String> {
        if params.b == 0.0 {
            warn!("Rejected division by zero");
            return Err(ToolError::domain(Self::DIVIDE_BY_ZERO));
        }

        let result = params.a / params.b;
        Ok(format!("{} ÷ {} = {}", params.a, params.b, result))
    }

    /// Create the registry descriptor for this tool.
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, Self::PARAMETERS, Self::execute)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide() {
        let text = DivideTool::execute(&DivideParams { a: 10.0, b: 4.0 }).unwrap();
        assert_eq!(text, "10 ÷ 4 = 2.5");
    }

    #[test]
    fn test_divide_result_matches_quotient() {
        let pairs = [(1.0, 3.0), (-22.0, 7.0), (1e-9, 2e5), (123.456, -0.001)];
        for (a, b) in pairs {
            let text = DivideTool::execute(&DivideParams { a, b }).unwrap();
            let value: f64 = text.rsplit(" = ").next().unwrap().parse().unwrap();
            assert_eq!(value, a / b);
        }
    }

    #[test]
    fn test_divide_by_zero() {
        for a in [10.0, 0.0, -5.5, f64::MAX] {
            let err = DivideTool::execute(&DivideParams { a, b: 0.0 }).unwrap_err();
            assert_eq!(err, ToolError::Domain("Cannot divide by zero".to_string()));
        }
    }

    #[test]
    fn test_divide_by_negative_zero() {
        let err = DivideTool::execute(&DivideParams { a: 1.0, b: -0.0 }).unwrap_err();
        assert!(matches!(err, ToolError::Domain(_)));
    }
}
