//! SOAP over HTTP transport for the Portico gateway.
//!
//! Wraps a request fragment in the gateway's SOAP envelope, posts it with
//! `reqwest`, and converts the XML reply into the tree the core pipeline reads.
//!
//! # Modules
//!
//! - [`soap`] - Envelope writing and reply parsing
//! - [`transport`] - The [`HttpTransport`] implementation of
//!   [`portico::Transport`]
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits debug events for each request and enables core spans

pub mod soap;
pub mod transport;

pub use transport::{HttpTransport, HttpTransportError};
