//! [`Transport`] over HTTP.
//!
//! One `POST` per request to the configured endpoint, with the SOAP envelope
//! as a `text/xml` body. The per-request timeout comes from
//! [`ServicesConfig::timeout`].

use std::fmt;
use std::time::Duration;

use http::header::CONTENT_TYPE;
use portico::{BoxFuture, GatewayRequest, ServicesConfig, Transport, TransportError};
use portico_proto::Reply;
use reqwest::Client;
use url::Url;

use crate::soap;

const CONTENT_TYPE_XML: &str = "text/xml; charset=utf-8";

/// Errors that can occur while constructing an [`HttpTransport`].
#[derive(Debug, thiserror::Error)]
pub enum HttpTransportError {
    /// The configured endpoint is not a valid URL.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

/// Sends gateway requests as SOAP over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    endpoint: Url,
    timeout: Duration,
    client: Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Builds a transport for the endpoint and timeout resolved by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportError::UrlParse`] when the resolved endpoint is
    /// not a valid URL.
    pub fn try_new(config: &ServicesConfig) -> Result<Self, HttpTransportError> {
        let endpoint = Url::parse(config.endpoint()).map_err(|source| HttpTransportError::UrlParse {
            context: "Failed to parse service url",
            source,
        })?;
        Ok(Self::with_client(endpoint, config.timeout(), Client::new()))
    }

    /// Builds a transport around an existing `reqwest` client.
    #[must_use]
    pub const fn with_client(endpoint: Url, timeout: Duration, client: Client) -> Self {
        Self {
            endpoint,
            timeout,
            client,
        }
    }

    /// Returns the endpoint requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn post(&self, request: &GatewayRequest) -> Result<Reply, TransportError> {
        let envelope = soap::write_envelope(request);

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            endpoint = %self.endpoint,
            transaction = request.transaction.name(),
            "posting gateway request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, CONTENT_TYPE_XML)
            .timeout(self.timeout)
            .body(envelope)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(format!("Failed to read response body: {e}")))?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(status = status.as_u16(), "gateway responded");

        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }
        soap::parse_reply(&body)
    }
}

impl Transport for HttpTransport {
    fn submit<'a>(
        &'a self,
        request: &'a GatewayRequest,
    ) -> BoxFuture<'a, Result<Reply, TransportError>> {
        Box::pin(self.post(request))
    }
}
