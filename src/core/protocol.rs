//! Wire message types for the tool-invocation protocol.
//!
//! Every frame is a JSON-RPC 2.0 object. The method names and payload shapes
//! follow the Model Context Protocol stdio transport, so the worker can be
//! driven by any MCP client and the client can drive an MCP tool server.
//!
//! | Exchange      | Method                      |
//! |---------------|-----------------------------|
//! | handshake     | `initialize`                |
//! | ready signal  | `notifications/initialized` |
//! | discovery     | `tools/list`                |
//! | invocation    | `tools/call`                |
//!
//! Tool failures travel two ways: domain errors come back as a successful
//! `tools/call` result with `isError: true`, while unknown operations and
//! invalid arguments come back as JSON-RPC errors whose `data.kind` names the
//! failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version string carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol revision negotiated during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Method names.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const PING: &str = "ping";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
}

/// JSON-RPC error codes.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const NOT_INITIALIZED: i32 = -32002;
}

// ============================================================================
// Envelopes
// ============================================================================

/// JSON-RPC request structure. A request without an id is a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a request carrying a correlation id.
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(Value::from(id)),
            method: method.into(),
            params,
        }
    }

    /// Create a notification (no id, never answered).
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params,
        }
    }

    /// Whether this message expects no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC response structure.
///
/// The id is always serialized; it is `null` when the request could not be
/// parsed far enough to recover one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Create an error response for a failed tool call, tagged with its kind.
    pub fn tool_error(id: Value, kind: ErrorKind, message: impl Into<String>) -> Self {
        let mut response = Self::error(id, kind.code(), message);
        if let Some(error) = response.error.as_mut() {
            error.data = serde_json::to_value(ErrorData { kind }).ok();
        }
        response
    }

    /// Parse error (frame was not JSON).
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(Value::Null, codes::PARSE_ERROR, msg)
    }

    /// Invalid request error.
    pub fn invalid_request(id: Value, msg: impl Into<String>) -> Self {
        Self::error(id, codes::INVALID_REQUEST, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::error(id, codes::METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    /// Invalid params error.
    pub fn invalid_params(id: Value, msg: impl Into<String>) -> Self {
        Self::error(id, codes::INVALID_PARAMS, msg)
    }

    /// Request arrived before the handshake.
    pub fn not_initialized(id: Value) -> Self {
        Self::error(id, codes::NOT_INITIALIZED, "Session not initialized")
    }

    /// Internal error.
    pub fn internal_error(id: Value, msg: impl Into<String>) -> Self {
        Self::error(id, codes::INTERNAL_ERROR, msg)
    }

    /// The failure kind attached to an error response, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        let data = self.error.as_ref()?.data.clone()?;
        serde_json::from_value::<ErrorData>(data)
            .ok()
            .map(|data| data.kind)
    }
}

/// Either side of a JSON-RPC exchange, as read off the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
}

impl Message {
    /// Parse one frame. Objects carrying a `method` are requests.
    pub fn parse(frame: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(frame)?;
        if value.get("method").is_some() {
            Ok(Self::Request(serde_json::from_value(value)?))
        } else {
            Ok(Self::Response(serde_json::from_value(value)?))
        }
    }
}

// ============================================================================
// Handshake payloads
// ============================================================================

/// Name and version of one side of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// Parameters of the `initialize` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    pub client_info: Implementation,
}

/// Result of the `initialize` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Capabilities advertised by the worker. Only tools are offered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
}

// ============================================================================
// Tool payloads
// ============================================================================

/// Type of a tool parameter. Every operation takes double-precision numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
}

/// One entry of a tool's ordered parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Number,
        }
    }
}

/// Tool metadata returned by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: Value,
    #[serde(default)]
    pub parameters: Vec<ParamSpec>,
}

/// Result of `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolInfo>,
}

/// Parameters of `tools/call`.
///
/// Arguments stay untyped here; the registry validates them against the
/// tool's parameter list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// Content block of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Result of `tools/call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(default)]
    pub is_error: bool,
}

impl CallToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: true,
        }
    }

    /// Concatenated text of all content blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|Content::Text { text }| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Failure kinds reported as JSON-RPC errors by `tools/call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownOperation,
    InvalidArguments,
}

impl ErrorKind {
    /// JSON-RPC code used on the wire for this kind.
    pub fn code(self) -> i32 {
        match self {
            Self::UnknownOperation => codes::METHOD_NOT_FOUND,
            Self::InvalidArguments => codes::INVALID_PARAMS,
        }
    }
}

/// `data` member of a tool error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorData {
    pub kind: ErrorKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = JsonRpcRequest::new(7, methods::TOOLS_CALL, Some(json!({"name": "add"})));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": {"name": "add"}})
        );
    }

    #[test]
    fn test_notification_has_no_id() {
        let notification = JsonRpcRequest::notification(methods::INITIALIZED, None);
        let text = serde_json::to_string(&notification).unwrap();
        assert!(!text.contains("\"id\""));
        assert!(notification.is_notification());
    }

    #[test]
    fn test_parse_error_carries_null_id() {
        let text = serde_json::to_string(&JsonRpcResponse::parse_error("bad frame")).unwrap();
        assert!(text.contains("\"id\":null"));
        assert!(text.contains("-32700"));
    }

    #[test]
    fn test_tool_error_kind_roundtrip() {
        let response =
            JsonRpcResponse::tool_error(json!(3), ErrorKind::UnknownOperation, "Unknown operation: pow");
        let error = response.error.as_ref().unwrap();
        assert_eq!(error.code, codes::METHOD_NOT_FOUND);
        assert_eq!(error.data, Some(json!({"kind": "unknown_operation"})));
        assert_eq!(response.error_kind(), Some(ErrorKind::UnknownOperation));
    }

    #[test]
    fn test_message_parse_distinguishes_directions() {
        let request = Message::parse(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).unwrap();
        assert!(matches!(request, Message::Request(r) if r.method == "ping"));

        let response = Message::parse(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#).unwrap();
        assert!(matches!(response, Message::Response(r) if r.id == json!(1)));

        assert!(Message::parse("not json").is_err());
    }

    #[test]
    fn test_call_tool_result_shape() {
        let value = serde_json::to_value(CallToolResult::error("Cannot divide by zero")).unwrap();
        assert_eq!(
            value,
            json!({
                "content": [{"type": "text", "text": "Cannot divide by zero"}],
                "isError": true
            })
        );
    }

    #[test]
    fn test_call_tool_result_missing_is_error_defaults_to_success() {
        let result: CallToolResult =
            serde_json::from_value(json!({"content": [{"type": "text", "text": "3"}]})).unwrap();
        assert!(!result.is_error);
        assert_eq!(result.text(), "3");
    }
}
