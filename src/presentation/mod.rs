//! Presentation layer: operand collection and result rendering.
//!
//! The user picks one of a closed set of operations and supplies one or two
//! numbers. Every call opens its own session, performs exactly one
//! invocation and shuts the worker down again.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::client::{ClientError, ClientResult, ClientSession};
use crate::core::ClientConfig;
use crate::core::protocol::ToolInfo;

/// Number of operands an operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

/// The operations offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Sqrt,
    ToInteger,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Sqrt,
        Self::ToInteger,
    ];

    /// Tool name on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Sqrt => "sqrt",
            Self::ToInteger => "to_integer",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Self::Sqrt | Self::ToInteger => Arity::Unary,
            _ => Arity::Binary,
        }
    }

    /// Short label for menus and help text.
    pub fn description(self) -> &'static str {
        match self {
            Self::Add => "Addition (a + b)",
            Self::Subtract => "Subtraction (a - b)",
            Self::Multiply => "Multiplication (a × b)",
            Self::Divide => "Division (a ÷ b)",
            Self::Sqrt => "Square root (√a)",
            Self::ToInteger => "Convert to integer",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClientError::UnknownOperation(format!("Unknown operation: {s}")))
    }
}

/// Run one operation against a freshly spawned worker.
///
/// A binary operation without its second operand fails before any process
/// is started. The second operand of a unary operation is ignored.
pub async fn perform_operation(
    config: &ClientConfig,
    operation: Operation,
    a: f64,
    b: Option<f64>,
) -> ClientResult<String> {
    let b = match (operation.arity(), b) {
        (Arity::Binary, None) => {
            return Err(ClientError::invalid_arguments(format!(
                "{operation} expects two operands"
            )));
        }
        (_, b) => b.unwrap_or_default(),
    };

    let mut session = ClientSession::connect(config).await?;
    let outcome = match operation {
        Operation::Add => session.add(a, b).await,
        Operation::Subtract => session.subtract(a, b).await,
        Operation::Multiply => session.multiply(a, b).await,
        Operation::Divide => session.divide(a, b).await,
        Operation::Sqrt => session.sqrt(a).await,
        Operation::ToInteger => session.to_integer(a).await,
    };

    if let Err(e) = session.close().await {
        warn!("Worker shutdown failed: {}", e);
    }
    outcome
}

/// List the tools a freshly spawned worker offers.
pub async fn available_tools(config: &ClientConfig) -> ClientResult<Vec<ToolInfo>> {
    let mut session = ClientSession::connect(config).await?;
    let tools = session.discover().await;
    if let Err(e) = session.close().await {
        warn!("Worker shutdown failed: {}", e);
    }
    tools
}

/// Render an outcome the way the CLI prints it.
pub fn render(outcome: &ClientResult<String>) -> String {
    match outcome {
        Ok(text) => format!("Result: {text}"),
        Err(e) => format!("Error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operation() {
        assert_eq!("add".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!(" SQRT ".parse::<Operation>().unwrap(), Operation::Sqrt);
        assert_eq!(
            "to_integer".parse::<Operation>().unwrap(),
            Operation::ToInteger
        );

        let err = "modulo".parse::<Operation>().unwrap_err();
        assert!(matches!(err, ClientError::UnknownOperation(_)));
        assert_eq!(err.to_string(), "Unknown operation: modulo");
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_arity() {
        assert_eq!(Operation::Divide.arity(), Arity::Binary);
        assert_eq!(Operation::Sqrt.arity(), Arity::Unary);
        assert_eq!(Operation::ToInteger.arity(), Arity::Unary);
    }

    #[tokio::test]
    async fn test_missing_operand_fails_before_connecting() {
        let config = ClientConfig::with_worker("/nonexistent/math-worker-missing");
        let err = perform_operation(&config, Operation::Divide, 1.0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_missing_worker_is_connection_error() {
        let config = ClientConfig::with_worker("/nonexistent/math-worker-missing");
        let err = perform_operation(&config, Operation::Sqrt, 9.0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&Ok("3".to_string())), "Result: 3");
        assert_eq!(
            render(&Err(ClientError::Domain("Cannot divide by zero".into()))),
            "Error: Cannot divide by zero"
        );
    }
}
