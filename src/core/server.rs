//! Worker endpoint implementation and lifecycle management.
//!
//! The endpoint owns the tool registry and serves one session over a framed
//! transport:
//!
//! ```text
//! AwaitingHandshake --initialize--> Ready --EOF--> Closed
//!                                     |  ^
//!                          tools/call |  | response written
//!                                     v  |
//!                                 Dispatching
//! ```
//!
//! Every request gets exactly one response, written before the next frame is
//! read. Failures inside a call (unknown tool, bad arguments, domain errors,
//! malformed frames) become error responses; only transport I/O failures end
//! the loop early.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::error::Category;
use serde_json::value::RawValue;
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use super::protocol::{
    CallToolParams, CallToolResult, ErrorKind, Implementation, InitializeParams,
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ListToolsResult, PROTOCOL_VERSION,
    ServerCapabilities, methods,
};
use super::transport::{Frame, FramedTransport, TransportError, TransportResult};
use crate::domains::tools::{ToolError, ToolRegistry};

/// Lifecycle state of a worker endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// Waiting for the client's `initialize` request.
    AwaitingHandshake,
    /// Handshake done; requests are dispatched.
    Ready,
    /// The transport reached EOF. Terminal.
    Closed,
}

/// The worker side of a session.
pub struct WorkerEndpoint {
    config: Arc<Config>,
    registry: Arc<ToolRegistry>,
    state: EndpointState,
}

impl WorkerEndpoint {
    /// Create an endpoint serving the math tools.
    pub fn new(config: Config) -> crate::Result<Self> {
        let registry = ToolRegistry::with_math_tools()?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create an endpoint serving an arbitrary registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        info!("Worker endpoint serving {} tools", registry.len());
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            state: EndpointState::AwaitingHandshake,
        }
    }

    /// Get the worker name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the worker version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn state(&self) -> EndpointState {
        self.state
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve one session until the peer closes the stream.
    ///
    /// Returns `Ok(())` on EOF. Blank lines are ignored.
    pub async fn run<R, W>(&mut self, reader: R, writer: W) -> TransportResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if self.state == EndpointState::Closed {
            return Err(TransportError::Closed);
        }

        let mut transport =
            FramedTransport::new(reader, writer, self.config.transport.max_frame_length);
        info!("Awaiting handshake");

        while let Some(frame) = transport.recv_frame().await? {
            let response = match frame {
                Frame::Line(line) if line.trim().is_empty() => continue,
                Frame::Line(line) => self.handle_frame(&line),
                Frame::TooLong => Some(JsonRpcResponse::invalid_request(
                    Value::Null,
                    format!(
                        "Frame exceeds maximum length of {} bytes",
                        transport.max_frame_length()
                    ),
                )),
                Frame::InvalidUtf8 => Some(JsonRpcResponse::parse_error(
                    "Parse error: frame is not valid UTF-8",
                )),
            };
            if let Some(response) = response {
                transport.send(&response).await?;
            }
        }

        self.state = EndpointState::Closed;
        info!("Transport closed by client");
        Ok(())
    }

    /// Handle one raw frame, returning the response to write (if any).
    pub fn handle_frame(&mut self, frame: &str) -> Option<JsonRpcResponse> {
        // Params stay raw until the envelope is known, so a value serde_json
        // cannot represent is reported against the request that carried it.
        let envelope: RequestEnvelope = match serde_json::from_str(frame) {
            Ok(envelope) => envelope,
            Err(e) if e.classify() == Category::Data => {
                warn!("Invalid request: {}", e);
                let id = serde_json::from_str::<Value>(frame)
                    .ok()
                    .and_then(|value| value.get("id").cloned())
                    .unwrap_or(Value::Null);
                return Some(JsonRpcResponse::invalid_request(
                    id,
                    format!("Invalid request: {e}"),
                ));
            }
            Err(e) => {
                warn!("Unparseable frame: {}", e);
                return Some(JsonRpcResponse::parse_error(format!("Parse error: {e}")));
            }
        };

        let params = envelope
            .params
            .as_deref()
            .map(|raw| serde_json::from_str::<Value>(raw.get()))
            .transpose();
        match params {
            Ok(params) => self.handle_request(JsonRpcRequest {
                jsonrpc: envelope.jsonrpc,
                id: envelope.id,
                method: envelope.method,
                params,
            }),
            Err(e) => self.reject_params(envelope.id, &envelope.method, &e),
        }
    }

    /// Answer a request whose params are well-formed JSON that cannot be
    /// decoded, such as a number outside the `f64` range.
    fn reject_params(
        &self,
        id: Option<Value>,
        method: &str,
        error: &serde_json::Error,
    ) -> Option<JsonRpcResponse> {
        let id = id?;
        warn!("Undecodable params for {}: {}", method, error);

        let response = match (self.state, method) {
            (EndpointState::AwaitingHandshake, m)
                if m != methods::INITIALIZE && m != methods::PING =>
            {
                JsonRpcResponse::not_initialized(id)
            }
            (_, methods::TOOLS_CALL) => JsonRpcResponse::tool_error(
                id,
                ErrorKind::InvalidArguments,
                ToolError::invalid_arguments(error.to_string()).to_string(),
            ),
            _ => JsonRpcResponse::invalid_params(id, format!("Invalid params: {error}")),
        };
        Some(response)
    }

    /// Handle a parsed request. Notifications never produce a response.
    #[instrument(skip_all, fields(method = %request.method))]
    pub fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::invalid_request(
                id,
                "Unsupported JSON-RPC version",
            ));
        }

        let response = match (self.state, request.method.as_str()) {
            (_, methods::PING) => JsonRpcResponse::success(id, json!({})),
            (_, methods::INITIALIZE) => self.handle_initialize(id, request.params),
            (EndpointState::AwaitingHandshake, method) => {
                warn!("Request {} before handshake", method);
                JsonRpcResponse::not_initialized(id)
            }
            (_, methods::TOOLS_LIST) => self.handle_tools_list(id),
            (_, methods::TOOLS_CALL) => self.handle_tools_call(id, request.params),
            (_, method) => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::method_not_found(id, method)
            }
        };

        Some(response)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            methods::INITIALIZED => info!("Client sent initialized notification"),
            other => debug!("Ignoring notification: {}", other),
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(params)) => info!(
                "Handshake from {} v{} (protocol {})",
                params.client_info.name, params.client_info.version, params.protocol_version
            ),
            Some(Err(e)) => {
                return JsonRpcResponse::invalid_params(id, format!("Invalid initialize params: {e}"));
            }
            None => debug!("Handshake without params"),
        }

        if self.state == EndpointState::Ready {
            warn!("Repeated initialize; session stays ready");
        }
        self.state = EndpointState::Ready;

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(json!({})),
            },
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
            },
            instructions: Some(
                "Math worker: call tools/list to discover operations, tools/call to run them."
                    .to_string(),
            ),
        };

        to_success(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        debug!("Listing {} tools", self.registry.len());
        let result = ListToolsResult {
            tools: self
                .registry
                .descriptors()
                .iter()
                .map(|tool| tool.info())
                .collect(),
        };
        to_success(id, &result)
    }

    /// Handle tools/call request.
    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::invalid_params(id, format!("Invalid call params: {e}"));
            }
            None => return JsonRpcResponse::invalid_params(id, "Missing params"),
        };

        info!("Calling tool: {}", params.name);
        match self.registry.call(&params.name, params.arguments) {
            Ok(text) => to_success(id, &CallToolResult::success(text)),
            Err(ToolError::Domain(message)) => {
                info!("Tool {} failed: {}", params.name, message);
                to_success(id, &CallToolResult::error(message))
            }
            Err(e @ ToolError::UnknownOperation(_)) => {
                warn!("{}", e);
                JsonRpcResponse::tool_error(id, ErrorKind::UnknownOperation, e.to_string())
            }
            Err(e @ ToolError::InvalidArguments(_)) => {
                warn!("Tool {}: {}", params.name, e);
                JsonRpcResponse::tool_error(id, ErrorKind::InvalidArguments, e.to_string())
            }
            Err(e @ ToolError::DuplicateName(_)) => JsonRpcResponse::internal_error(id, e.to_string()),
        }
    }
}

/// A request with its params left undecoded.
#[derive(Deserialize)]
struct RequestEnvelope {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Box<RawValue>>,
}

fn to_success<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::internal_error(id, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::protocol::{ListToolsResult, codes};
    use tokio::io::split;

    fn endpoint() -> WorkerEndpoint {
        WorkerEndpoint::new(Config::default()).unwrap()
    }

    fn ready_endpoint() -> WorkerEndpoint {
        let mut endpoint = endpoint();
        endpoint
            .handle_frame(r#"{"jsonrpc":"2.0","id":0,"method":"initialize"}"#)
            .unwrap();
        endpoint
    }

    fn call(endpoint: &mut WorkerEndpoint, id: u64, name: &str, arguments: Value) -> JsonRpcResponse {
        let request = JsonRpcRequest::new(
            id,
            methods::TOOLS_CALL,
            Some(json!({"name": name, "arguments": arguments})),
        );
        endpoint.handle_request(request).unwrap()
    }

    fn tool_result(response: &JsonRpcResponse) -> CallToolResult {
        serde_json::from_value(response.result.clone().unwrap()).unwrap()
    }

    #[test]
    fn test_requests_before_handshake_are_rejected() {
        let mut endpoint = endpoint();
        let response = call(&mut endpoint, 1, "add", json!({"a": 1, "b": 2}));
        assert_eq!(response.error.unwrap().code, codes::NOT_INITIALIZED);
        assert_eq!(endpoint.state(), EndpointState::AwaitingHandshake);
    }

    #[test]
    fn test_initialize_moves_to_ready() {
        let mut endpoint = endpoint();
        let request = JsonRpcRequest::new(
            1,
            methods::INITIALIZE,
            Some(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "0.0.1"}
            })),
        );
        let response = endpoint.handle_request(request).unwrap();
        let result: InitializeResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(result.server_info.name, "math-mcp-server");
        assert!(result.capabilities.tools.is_some());
        assert_eq!(endpoint.state(), EndpointState::Ready);
    }

    #[test]
    fn test_initialized_notification_has_no_response() {
        let mut endpoint = ready_endpoint();
        let response =
            endpoint.handle_frame(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
        assert!(response.is_none());
    }

    #[test]
    fn test_tools_list() {
        let mut endpoint = ready_endpoint();
        let response = endpoint
            .handle_request(JsonRpcRequest::new(2, methods::TOOLS_LIST, None))
            .unwrap();
        let result: ListToolsResult = serde_json::from_value(response.result.unwrap()).unwrap();
        let names: Vec<_> = result.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["add", "subtract", "multiply", "divide", "sqrt", "to_integer"]
        );
        assert_eq!(result.tools[4].parameters.len(), 1);
    }

    #[test]
    fn test_call_success_echoes_id() {
        let mut endpoint = ready_endpoint();
        let response = call(&mut endpoint, 42, "add", json!({"a": 2, "b": 3}));
        assert_eq!(response.id, json!(42));
        let result = tool_result(&response);
        assert!(!result.is_error);
        assert_eq!(result.text(), "2 + 3 = 5");
    }

    #[test]
    fn test_call_domain_error_is_tool_result() {
        let mut endpoint = ready_endpoint();
        let response = call(&mut endpoint, 3, "divide", json!({"a": 10, "b": 0}));
        assert!(response.error.is_none());
        let result = tool_result(&response);
        assert!(result.is_error);
        assert_eq!(result.text(), "Cannot divide by zero");
    }

    #[test]
    fn test_call_unknown_operation() {
        let mut endpoint = ready_endpoint();
        let response = call(&mut endpoint, 4, "pow", json!({}));
        assert_eq!(response.error_kind(), Some(ErrorKind::UnknownOperation));
        assert_eq!(response.error.unwrap().message, "Unknown operation: pow");
    }

    #[test]
    fn test_call_invalid_arguments() {
        let mut endpoint = ready_endpoint();
        let response = call(&mut endpoint, 5, "multiply", json!({"a": 1}));
        assert_eq!(response.error_kind(), Some(ErrorKind::InvalidArguments));
        assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
    }

    #[test]
    fn test_call_without_params() {
        let mut endpoint = ready_endpoint();
        let response = endpoint
            .handle_request(JsonRpcRequest::new(6, methods::TOOLS_CALL, None))
            .unwrap();
        assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
    }

    #[test]
    fn test_failures_do_not_affect_later_calls() {
        let mut endpoint = ready_endpoint();
        call(&mut endpoint, 1, "sqrt", json!({"a": -4}));
        call(&mut endpoint, 2, "nope", json!({}));
        endpoint.handle_frame("{broken");
        let response = call(&mut endpoint, 3, "sqrt", json!({"a": 9}));
        assert_eq!(tool_result(&response).text(), "3");
    }

    #[test]
    fn test_parse_error_has_null_id() {
        let mut endpoint = ready_endpoint();
        let response = endpoint.handle_frame("{not json").unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, codes::PARSE_ERROR);
    }

    #[test]
    fn test_invalid_request_keeps_id() {
        let mut endpoint = ready_endpoint();
        let response = endpoint
            .handle_frame(r#"{"jsonrpc":"2.0","id":9,"method":42}"#)
            .unwrap();
        assert_eq!(response.id, json!(9));
        assert_eq!(response.error.unwrap().code, codes::INVALID_REQUEST);
    }

    #[test]
    fn test_unknown_method() {
        let mut endpoint = ready_endpoint();
        let response = endpoint
            .handle_request(JsonRpcRequest::new(7, "resources/list", None))
            .unwrap();
        assert_eq!(response.error.unwrap().code, codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_out_of_range_argument_is_invalid_arguments() {
        let mut endpoint = ready_endpoint();
        let response = endpoint
            .handle_frame(
                r#"{"jsonrpc":"2.0","id":11,"method":"tools/call","params":{"name":"sqrt","arguments":{"a":1e400}}}"#,
            )
            .unwrap();
        assert_eq!(response.id, json!(11));
        assert_eq!(response.error_kind(), Some(ErrorKind::InvalidArguments));
        assert!(response.error.unwrap().message.starts_with("Invalid arguments: "));
    }

    #[test]
    fn test_out_of_range_argument_before_handshake() {
        let mut endpoint = endpoint();
        let response = endpoint
            .handle_frame(
                r#"{"jsonrpc":"2.0","id":12,"method":"tools/call","params":{"name":"sqrt","arguments":{"a":-1e999}}}"#,
            )
            .unwrap();
        assert_eq!(response.id, json!(12));
        assert_eq!(response.error.unwrap().code, codes::NOT_INITIALIZED);
    }

    #[tokio::test]
    async fn test_run_survives_malformed_frames() {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, duplex};

        let mut config = Config::default();
        config.transport.max_frame_length = 64;
        let mut endpoint = WorkerEndpoint::new(config).unwrap();

        let (client, worker) = duplex(4096);
        let task = tokio::spawn(async move {
            let (reader, writer) = split(worker);
            endpoint.run(reader, writer).await
        });

        let (client_reader, mut client_writer) = split(client);
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\",\"x\":\"\xff\xfe\"}\n");
        input.extend_from_slice(format!("{}\n", "x".repeat(200)).as_bytes());
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");
        client_writer.write_all(&input).await.unwrap();
        client_writer.shutdown().await.unwrap();

        let mut lines = BufReader::new(client_reader).lines();
        let mut responses = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            responses.push(serde_json::from_str::<JsonRpcResponse>(&line).unwrap());
        }

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].error.as_ref().unwrap().code, codes::PARSE_ERROR);
        assert_eq!(responses[1].error.as_ref().unwrap().code, codes::INVALID_REQUEST);
        assert_eq!(responses[1].id, Value::Null);
        assert_eq!(responses[2].id, json!(2));
        assert_eq!(responses[2].result, Some(json!({})));

        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_run_answers_ping_and_closes_on_eof() {
        let mock = tokio_test::io::Builder::new()
            .read(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
            .write(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n")
            .build();
        let (reader, writer) = split(mock);

        let mut endpoint = endpoint();
        endpoint.run(reader, writer).await.unwrap();
        assert_eq!(endpoint.state(), EndpointState::Closed);
    }

    #[tokio::test]
    async fn test_closed_endpoint_cannot_run_again() {
        let mut endpoint = endpoint();
        endpoint.run(tokio::io::empty(), tokio::io::sink()).await.unwrap();
        let err = endpoint
            .run(tokio::io::empty(), tokio::io::sink())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }
}
