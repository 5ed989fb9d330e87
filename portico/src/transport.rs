//! The seam between the core pipeline and the wire.
//!
//! The core hands a [`GatewayRequest`] (credentials header plus the
//! transaction fragment) to a [`Transport`] and receives the reply envelope
//! already converted to a [`Reply`]. Envelope writing, HTTP and XML parsing
//! live in the transport implementation.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use portico_proto::{Element, Reply};

/// Boxed, sendable future returned by [`Transport::submit`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sends one request to the gateway and returns its reply.
///
/// Implementations are constructed once by the host application and shared
/// across builders behind an `Arc`.
pub trait Transport: Send + Sync {
    /// Submits a request.
    ///
    /// Fails on a non-success HTTP status, a connection failure, or a reply
    /// envelope that cannot be read.
    fn submit<'a>(&'a self, request: &'a GatewayRequest)
    -> BoxFuture<'a, Result<Reply, TransportError>>;
}

/// Credentials and routing values sent in the request header.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestHeader {
    /// Bearer secret API key.
    pub secret_api_key: Option<String>,
    /// Site id of the credential tuple.
    pub site_id: Option<String>,
    /// Device id of the credential tuple.
    pub device_id: Option<String>,
    /// License id of the credential tuple.
    pub license_id: Option<String>,
    /// User name of the credential tuple.
    pub user_name: Option<String>,
    /// Password of the credential tuple.
    pub password: Option<String>,
    /// Developer id assigned at certification.
    pub developer_id: Option<String>,
    /// Version number assigned at certification.
    pub version_number: Option<String>,
    /// Free-form trace value echoed in gateway logs.
    pub site_trace: Option<String>,
    /// Merchant-assigned client transaction id.
    pub client_txn_id: Option<i64>,
}

impl fmt::Debug for RequestHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHeader")
            .field("has_secret_api_key", &self.secret_api_key.is_some())
            .field("site_id", &self.site_id)
            .field("device_id", &self.device_id)
            .field("license_id", &self.license_id)
            .field("user_name", &self.user_name)
            .field("has_password", &self.password.is_some())
            .field("developer_id", &self.developer_id)
            .field("version_number", &self.version_number)
            .field("site_trace", &self.site_trace)
            .field("client_txn_id", &self.client_txn_id)
            .finish()
    }
}

/// A fully formed request ready for the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    /// Credentials and routing header.
    pub header: RequestHeader,
    /// Top-level transaction element, e.g. `CreditSale`.
    pub transaction: Element,
}

/// Transport-level failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The gateway answered with a non-success HTTP status.
    #[error("Unexpected HTTP status {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// The request could not be sent or the reply could not be read.
    #[error("Connection failed: {0}")]
    Connection(String),
    /// The reply envelope was not a readable gateway reply.
    #[error("Malformed reply: {0}")]
    MalformedReply(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_debug_hides_secrets() {
        let header = RequestHeader {
            secret_api_key: Some("skapi_cert_secret".into()),
            password: Some("hunter2".into()),
            site_id: Some("12345".into()),
            ..RequestHeader::default()
        };
        let rendered = format!("{header:?}");
        assert!(!rendered.contains("skapi_cert_secret"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("12345"));
    }
}
