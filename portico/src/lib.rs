#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Transaction pipeline for the Portico payment gateway.
//!
//! Merchant code builds a transaction with a typed builder, and the client
//! validates it, serializes it into the gateway's request fragment, submits
//! it through a [`Transport`], maps the reply into a typed response and
//! translates failure codes into a structured error taxonomy. Gateway and
//! issuer timeouts on authorizations and sales are compensated with a single
//! reversal before the timeout is raised.
//!
//! # Modules
//!
//! - [`builders`] - Typed builders, one per transaction kind
//! - [`client`] - The pipeline and recovery driver
//! - [`codes`] - Gateway, issuer and gift card response code tables
//! - [`config`] - Credentials, endpoint resolution and untyped loading
//! - [`entities`] - Request and response records
//! - [`error`] - Error taxonomy and exception records
//! - [`kind`] - Transaction kinds and their wire tags
//! - [`mapper`] - Reply to typed response mapping
//! - [`recovery`] - Reply classification and reversal outcomes
//! - [`serializer`] - Request fragments per transaction kind
//! - [`transport`] - The seam to the wire
//! - [`validation`] - Rules evaluated at `execute()` time
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing spans around `execute()` and recovery events

pub mod builders;
pub mod client;
pub mod codes;
pub mod config;
pub mod entities;
pub mod error;
pub mod kind;
pub mod mapper;
pub mod recovery;
pub mod serializer;
pub mod transport;
pub mod validation;

pub use client::PorticoClient;
pub use config::ServicesConfig;
pub use error::{ErrorCode, ErrorKind, ExceptionRecord, PorticoError};
pub use kind::TransactionKind;
pub use transport::{BoxFuture, GatewayRequest, RequestHeader, Transport, TransportError};
