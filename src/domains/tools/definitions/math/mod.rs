//! Arithmetic tools.
//!
//! Binary operations render the whole computation (`"2 + 3 = 5"`); `sqrt`
//! and `to_integer` render the bare value. Numbers use the shortest
//! round-trip form of `f64` (`5`, `2.5`, `-2`).

pub mod add;
pub mod divide;
pub mod multiply;
pub mod sqrt;
pub mod subtract;
pub mod to_integer;

pub use add::{AddParams, AddTool};
pub use divide::{DivideParams, DivideTool};
pub use multiply::{MultiplyParams, MultiplyTool};
pub use sqrt::{SqrtParams, SqrtTool};
pub use subtract::{SubtractParams, SubtractTool};
pub use to_integer::{ToIntegerParams, ToIntegerTool};

use crate::domains::tools::ToolDescriptor;

/// Get all math tools in registration order.
///
/// This is the single source of truth for the worker's tool set. When adding
/// a new tool, add it here.
pub fn all_tools() -> Vec<ToolDescriptor> {
    vec![
        AddTool::descriptor(),
        SubtractTool::descriptor(),
        MultiplyTool::descriptor(),
        DivideTool::descriptor(),
        SqrtTool::descriptor(),
        ToIntegerTool::descriptor(),
    ]
}
