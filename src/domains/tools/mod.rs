//! Tools domain module.
//!
//! This module handles all tool-related functionality for the worker.
//! Tools are named, schema-described functions that clients call over the
//! transport.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Tool descriptors, the name-keyed registry and argument validation
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a params struct, `execute()`
//!    and `descriptor()`
//! 2. Export it from the parent `mod.rs`
//! 3. Add its descriptor to `all_tools()`
//!
//! The worker endpoint never needs to change: dispatch is by name through
//! the registry.

pub mod definitions;
mod error;
mod registry;

pub use error::{ToolError, ToolResult};
pub use registry::{Arguments, Handler, ToolDescriptor, ToolRegistry};
