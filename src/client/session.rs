//! Client session implementation.
//!
//! A `ClientSession` exists only after a successful handshake, so every
//! method on it may assume the worker is ready. Calls take `&mut self`: one
//! request is in flight at a time and responses are matched by id.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::error::{ClientError, ClientResult};
use crate::core::config::ClientConfig;
use crate::core::protocol::{
    CallToolParams, CallToolResult, Implementation, InitializeParams, InitializeResult,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, Message, PROTOCOL_VERSION, ToolInfo,
    methods,
};
use crate::core::transport::{ChildTransport, FramedTransport, reap};

/// Name the client reports during the handshake.
pub const CLIENT_NAME: &str = "math-client";

type BoxReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// An initialized session with a worker endpoint.
///
/// When created with [`ClientSession::connect`], the session owns the worker
/// process. Dropping the session kills the worker; [`ClientSession::close`]
/// lets it exit on its own first.
pub struct ClientSession {
    transport: FramedTransport<BoxReader, BoxWriter>,
    child: Option<Child>,
    config: ClientConfig,
    next_id: u64,
    server_info: Implementation,
    broken: bool,
}

impl ClientSession {
    /// Spawn the configured worker and perform the handshake.
    ///
    /// Fails with [`ClientError::Connection`] if the process cannot be
    /// started or the handshake does not complete within
    /// `handshake_timeout`.
    pub async fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let ChildTransport {
            child,
            stdin,
            stdout,
        } = ChildTransport::spawn(&config.worker_path, &config.worker_args)
            .map_err(|e| ClientError::connection(e.to_string()))?;

        let mut session = Self::new(Box::new(stdout), Box::new(stdin), Some(child), config.clone());
        session.initialize().await?;
        Ok(session)
    }

    /// Perform the handshake over an existing byte stream pair.
    pub async fn handshake<R, W>(reader: R, writer: W, config: ClientConfig) -> ClientResult<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let mut session = Self::new(Box::new(reader), Box::new(writer), None, config);
        session.initialize().await?;
        Ok(session)
    }

    fn new(reader: BoxReader, writer: BoxWriter, child: Option<Child>, config: ClientConfig) -> Self {
        Self {
            transport: FramedTransport::new(reader, writer, config.max_frame_length),
            child,
            config,
            next_id: 1,
            server_info: Implementation {
                name: String::new(),
                version: String::new(),
            },
            broken: false,
        }
    }

    /// Name and version the worker reported during the handshake.
    pub fn server_info(&self) -> &Implementation {
        &self.server_info
    }

    /// Whether a transport failure or timeout has made the session unusable.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    async fn initialize(&mut self) -> ClientResult<()> {
        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: json!({}),
            client_info: Implementation {
                name: CLIENT_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        let params = serde_json::to_value(&params)?;

        let limit = self.config.handshake_timeout;
        let result = match timeout(limit, self.request(methods::INITIALIZE, Some(params))).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => return Err(ClientError::connection(format!("handshake failed: {e}"))),
            Err(_) => {
                self.broken = true;
                return Err(ClientError::connection(format!(
                    "handshake did not complete within {limit:?}"
                )));
            }
        };

        let ack: InitializeResult = serde_json::from_value(result)
            .map_err(|e| ClientError::connection(format!("invalid handshake response: {e}")))?;
        if ack.protocol_version != PROTOCOL_VERSION {
            warn!(
                "Worker speaks protocol {}, expected {}",
                ack.protocol_version, PROTOCOL_VERSION
            );
        }

        self.transport
            .send(&JsonRpcRequest::notification(methods::INITIALIZED, None))
            .await
            .map_err(|e| ClientError::connection(format!("handshake failed: {e}")))?;

        info!(
            "Connected to {} v{}",
            ack.server_info.name, ack.server_info.version
        );
        self.server_info = ack.server_info;
        Ok(())
    }

    /// List the worker's operations with their parameter schemas.
    pub async fn discover(&mut self) -> ClientResult<Vec<ToolInfo>> {
        let value = self.call(methods::TOOLS_LIST, None).await?;
        let result: ListToolsResult = serde_json::from_value(value)?;
        debug!("Discovered {} tools", result.tools.len());
        Ok(result.tools)
    }

    /// Call an operation by name and return its result text.
    ///
    /// Tool failures map to [`ClientError::UnknownOperation`],
    /// [`ClientError::InvalidArguments`] or [`ClientError::Domain`]; the
    /// session stays usable after any of them.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(&mut self, name: &str, arguments: Value) -> ClientResult<String> {
        let params = CallToolParams {
            name: name.to_string(),
            arguments: Some(arguments),
        };
        let value = self
            .call(methods::TOOLS_CALL, Some(serde_json::to_value(&params)?))
            .await?;

        let result: CallToolResult = serde_json::from_value(value)?;
        if result.is_error {
            Err(ClientError::Domain(result.text()))
        } else {
            Ok(result.text())
        }
    }

    pub async fn add(&mut self, a: f64, b: f64) -> ClientResult<String> {
        self.invoke("add", json!({ "a": a, "b": b })).await
    }

    pub async fn subtract(&mut self, a: f64, b: f64) -> ClientResult<String> {
        self.invoke("subtract", json!({ "a": a, "b": b })).await
    }

    pub async fn multiply(&mut self, a: f64, b: f64) -> ClientResult<String> {
        self.invoke("multiply", json!({ "a": a, "b": b })).await
    }

    pub async fn divide(&mut self, a: f64, b: f64) -> ClientResult<String> {
        self.invoke("divide", json!({ "a": a, "b": b })).await
    }

    pub async fn sqrt(&mut self, a: f64) -> ClientResult<String> {
        self.invoke("sqrt", json!({ "a": a })).await
    }

    pub async fn to_integer(&mut self, a: f64) -> ClientResult<String> {
        self.invoke("to_integer", json!({ "a": a })).await
    }

    /// Close the pipes and wait for the worker to exit.
    ///
    /// The worker gets `shutdown_timeout` to notice EOF before it is killed.
    pub async fn close(self) -> ClientResult<()> {
        let Self {
            transport,
            child,
            config,
            ..
        } = self;
        drop(transport);

        if let Some(child) = child {
            reap(child, config.shutdown_timeout).await?;
        }
        Ok(())
    }

    /// One request/response round trip bounded by `request_timeout`.
    async fn call(&mut self, method: &str, params: Option<Value>) -> ClientResult<Value> {
        let limit: Duration = self.config.request_timeout;
        match timeout(limit, self.request(method, params)).await {
            Ok(result) => result,
            Err(_) => {
                // A late response would be read as the answer to the next call.
                warn!("{} timed out after {:?}", method, limit);
                self.broken = true;
                Err(ClientError::Timeout(limit))
            }
        }
    }

    async fn request(&mut self, method: &str, params: Option<Value>) -> ClientResult<Value> {
        if self.broken {
            return Err(ClientError::TransportClosed);
        }

        let id = self.next_id;
        self.next_id += 1;

        debug!(id, method, "Sending request");
        if let Err(e) = self.transport.send(&JsonRpcRequest::new(id, method, params)).await {
            self.broken = true;
            return Err(e.into());
        }

        let response = match self.read_response(id).await {
            Ok(response) => response,
            Err(e) => {
                self.broken = true;
                return Err(e);
            }
        };

        match response.result {
            Some(result) if response.error.is_none() => Ok(result),
            _ => Err(ClientError::from_response(&response)),
        }
    }

    async fn read_response(&mut self, id: u64) -> ClientResult<JsonRpcResponse> {
        loop {
            let frame = self
                .transport
                .recv()
                .await?
                .ok_or(ClientError::TransportClosed)?;
            if frame.trim().is_empty() {
                continue;
            }

            match Message::parse(&frame)? {
                Message::Response(response) if response.id == Value::from(id) => {
                    return Ok(response);
                }
                Message::Response(response) => {
                    return Err(ClientError::protocol(format!(
                        "response id {} does not match request id {}",
                        response.id, id
                    )));
                }
                Message::Request(request) => {
                    debug!("Ignoring worker-initiated {}", request.method);
                }
            }
        }
    }
}
