//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the math tool
//! protocol, including error handling, configuration, logging, the wire
//! message types, the worker endpoint and the framed transport.

pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod transport;

pub use config::{ClientConfig, Config};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use server::{EndpointState, WorkerEndpoint};
pub use transport::{TransportConfig, TransportService};
