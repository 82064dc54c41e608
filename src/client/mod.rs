//! Client side of the tool-invocation protocol.
//!
//! [`ClientSession`] spawns a worker, performs the handshake and then offers
//! discovery and invocation. Typical use:
//!
//! ```rust,no_run
//! use math_mcp_server::client::ClientSession;
//! use math_mcp_server::core::ClientConfig;
//!
//! # async fn demo() -> Result<(), math_mcp_server::client::ClientError> {
//! let mut session = ClientSession::connect(&ClientConfig::from_env()).await?;
//! let text = session.add(2.0, 3.0).await?;
//! assert_eq!(text, "2 + 3 = 5");
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod session;

pub use error::{ClientError, ClientResult};
pub use session::{CLIENT_NAME, ClientSession};
