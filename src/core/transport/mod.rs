//! Transport layer for the math tool protocol.
//!
//! Messages travel as newline-delimited JSON over a pair of byte streams:
//! - **framed**: the line codec shared by both sides
//! - **stdio**: the worker side, bound to the process's stdin/stdout
//! - **child**: the client side, a spawned worker's piped stdin/stdout
//!
//! Each transport carries exactly one session. Delivery is ordered and
//! reliable; there is no multiplexing.

mod child;
mod config;
mod error;
mod framed;
mod service;
pub mod stdio;

pub use child::ChildTransport;
pub(crate) use child::reap;
pub use config::{DEFAULT_MAX_FRAME_LENGTH, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use framed::{Frame, FramedTransport};
pub use service::TransportService;
