//! Domain modules containing business logic.
//!
//! Each domain is a bounded context with its own error types and registry.
//! The worker currently exposes a single domain: arithmetic tools.

pub mod tools;
