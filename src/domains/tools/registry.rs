//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - `ToolDescriptor`, the immutable name + parameter list + handler triple
//! - `ToolRegistry`, the name-keyed table the worker dispatches through
//! - argument validation against a descriptor's parameter list

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::definitions::math;
use super::error::{ToolError, ToolResult};
use crate::core::protocol::{ParamKind, ParamSpec, ToolInfo};

/// Validated call arguments, keyed by parameter name.
pub type Arguments = Map<String, Value>;

/// Type-erased tool handler.
pub type Handler = Arc<dyn Fn(&Arguments) -> ToolResult<String> + Send + Sync>;

// ============================================================================
// Tool Descriptor
// ============================================================================

/// A registered operation. Immutable once built.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Vec<ParamSpec>,
    input_schema: Value,
    handler: Handler,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl ToolDescriptor {
    /// Build a descriptor from a typed parameter struct and an execute function.
    ///
    /// `parameters` lists the numeric parameters in call order. The JSON
    /// schema advertised to clients is generated from `P`.
    pub fn new<P>(
        name: &str,
        description: &str,
        parameters: &[&str],
        execute: fn(&P) -> ToolResult<String>,
    ) -> Self
    where
        P: DeserializeOwned + JsonSchema + 'static,
    {
        let handler: Handler = Arc::new(move |args: &Arguments| {
            let params: P = serde_json::from_value(Value::Object(args.clone()))
                .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
            execute(&params)
        });

        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: parameters.iter().map(|p| ParamSpec::number(*p)).collect(),
            input_schema: serde_json::to_value(schemars::schema_for!(P)).unwrap_or(Value::Null),
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParamSpec] {
        &self.parameters
    }

    /// Check arguments against the parameter list.
    ///
    /// Every declared parameter must be present and numeric, and nothing
    /// else may be supplied.
    pub fn validate(&self, arguments: &Arguments) -> ToolResult<()> {
        for param in &self.parameters {
            let value = arguments.get(&param.name).ok_or_else(|| {
                ToolError::invalid_arguments(format!(
                    "{} expects {} argument(s) ({}), missing '{}'",
                    self.name,
                    self.parameters.len(),
                    self.parameter_list(),
                    param.name
                ))
            })?;
            match param.kind {
                ParamKind::Number if value.is_number() => {}
                ParamKind::Number => {
                    return Err(ToolError::invalid_arguments(format!(
                        "parameter '{}' must be a number, got {}",
                        param.name,
                        json_type(value)
                    )));
                }
            }
        }

        if let Some(extra) = arguments
            .keys()
            .find(|key| !self.parameters.iter().any(|p| &p.name == *key))
        {
            return Err(ToolError::invalid_arguments(format!(
                "{} expects {} argument(s) ({}), got unexpected '{}'",
                self.name,
                self.parameters.len(),
                self.parameter_list(),
                extra
            )));
        }

        Ok(())
    }

    /// Validate then run the handler.
    pub fn call(&self, arguments: &Arguments) -> ToolResult<String> {
        self.validate(arguments)?;
        (self.handler)(arguments)
    }

    /// Metadata for `tools/list`.
    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: self.input_schema.clone(),
            parameters: self.parameters.clone(),
        }
    }

    fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - the name-keyed table of available operations.
///
/// Registration order is preserved for listing.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the six math tools.
    pub fn with_math_tools() -> ToolResult<Self> {
        let mut registry = Self::new();
        for descriptor in math::all_tools() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Register a tool. Names are unique.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> ToolResult<()> {
        if self.index.contains_key(descriptor.name()) {
            warn!("Rejecting duplicate tool: {}", descriptor.name());
            return Err(ToolError::duplicate_name(descriptor.name()));
        }
        debug!("Registering tool: {}", descriptor.name());
        self.index
            .insert(descriptor.name().to_string(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> ToolResult<&ToolDescriptor> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| ToolError::unknown_operation(name))
    }

    /// All tools in registration order.
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(ToolDescriptor::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call by name with raw wire arguments.
    ///
    /// Absent arguments are treated as an empty object.
    pub fn call(&self, name: &str, arguments: Option<Value>) -> ToolResult<String> {
        let tool = self.lookup(name)?;
        let arguments = match arguments {
            None | Some(Value::Null) => Arguments::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be an object, got {}",
                    json_type(&other)
                )));
            }
        };
        tool.call(&arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, JsonSchema)]
    struct NegateParams {
        x: f64,
    }

    fn negate(params: &NegateParams) -> ToolResult<String> {
        Ok(format!("{}", -params.x))
    }

    fn negate_tool() -> ToolDescriptor {
        ToolDescriptor::new("negate", "Negate a number", &["x"], negate)
    }

    #[test]
    fn test_math_registry_tool_names() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        assert_eq!(
            registry.tool_names(),
            vec!["add", "subtract", "multiply", "divide", "sqrt", "to_integer"]
        );
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = ToolRegistry::new();
        registry.register(negate_tool()).unwrap();
        let err = registry.register(negate_tool()).unwrap_err();
        assert_eq!(err, ToolError::DuplicateName("negate".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        let err = registry.lookup("pow").unwrap_err();
        assert_eq!(err.to_string(), "Unknown operation: pow");
    }

    #[test]
    fn test_registry_accepts_custom_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(negate_tool()).unwrap();
        let result = registry.call("negate", Some(json!({"x": 2.5}))).unwrap();
        assert_eq!(result, "-2.5");
    }

    #[test]
    fn test_call_missing_argument() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        let err = registry.call("add", Some(json!({"a": 1}))).unwrap_err();
        match err {
            ToolError::InvalidArguments(msg) => {
                assert!(msg.contains("missing 'b'"), "{msg}");
                assert!(msg.contains("2 argument(s)"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_call_extra_argument() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        let err = registry
            .call("sqrt", Some(json!({"a": 4, "b": 1})))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(ref m) if m.contains("unexpected 'b'")));
    }

    #[test]
    fn test_call_non_numeric_argument() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        let err = registry
            .call("add", Some(json!({"a": "2", "b": 3})))
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::InvalidArguments("parameter 'a' must be a number, got string".to_string())
        );
    }

    #[test]
    fn test_call_arguments_not_an_object() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        let err = registry.call("add", Some(json!([1, 2]))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(ref m) if m.contains("array")));
    }

    #[test]
    fn test_call_without_arguments() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        let err = registry.call("sqrt", None).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_unknown_checked_before_arguments() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        let err = registry.call("pow", Some(json!("garbage"))).unwrap_err();
        assert!(matches!(err, ToolError::UnknownOperation(_)));
    }

    #[test]
    fn test_info_exposes_ordered_parameters_and_schema() {
        let registry = ToolRegistry::with_math_tools().unwrap();
        let info = registry.lookup("divide").unwrap().info();
        let names: Vec<_> = info.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(info.input_schema["type"], json!("object"));
        assert!(info.input_schema["properties"].get("b").is_some());
    }
}
