//! Wire format types for the Portico gateway protocol.
//!
//! This crate defines the serialization-level structures exchanged with the
//! gateway. It knows nothing about transaction semantics: the core crate
//! builds [`Element`] trees and reads [`Reply`] envelopes, while the transport
//! crate turns them into SOAP and back.
//!
//! # Modules
//!
//! - [`element`] - Ordered request element tree
//! - [`encoding`] - Fixed-point amounts, `Y`/`N` flags and UTC timestamps
//! - [`reply`] - Reply envelope view and presence-based field accessors

pub mod element;
pub mod encoding;
pub mod reply;

pub use element::Element;
pub use reply::{Fields, Reply, ReplyHeader, ReplyToken};

/// Gateway response code reported for an accepted request.
pub const GATEWAY_SUCCESS: &str = "0";

/// Errors that can occur when reading a gateway reply.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The reply has no `Header` object.
    #[error("reply is missing the Header section")]
    MissingHeader,

    /// A required field is missing from the reply.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but cannot be interpreted.
    #[error("invalid value for {field}: {value}")]
    InvalidField {
        /// The offending field name.
        field: &'static str,
        /// The raw value found in the reply.
        value: String,
    },

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
