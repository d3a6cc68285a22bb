//! Stateless HTTP invoker.
//!
//! Every call is one `POST {scheme}://{host}:{port}/jsonrpc` carrying a single
//! JSON-RPC envelope. There is no handshake and no persistent state besides
//! the pooled `reqwest::Client`.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{trace, warn};

use crate::error::{TransportError, TransportResult};
use crate::protocol::{Params, Request, Response};

use super::{Credentials, Transport};

// ============================================================================
// HttpTransport
// ============================================================================

/// JSON-RPC over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Shared HTTP client (the session).
    client: reqwest::Client,
    /// Full `/jsonrpc` endpoint URL.
    endpoint: String,
    /// Basic credentials, if configured.
    credentials: Option<Credentials>,
    /// Per-request timeout.
    timeout: Duration,
}

impl HttpTransport {
    /// Creates an invoker bound to `endpoint`.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            credentials,
            timeout,
        }
    }

    /// Returns the endpoint URL.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(&self, method: &str, params: Params) -> TransportResult<Value> {
        let request = Request::new(method, params);
        let request_id = request.id;

        let mut builder = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&request);

        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(credentials.username(), Some(credentials.password()));
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(method, %status, "HTTP request rejected");
            return Err(TransportError::Http { status, body });
        }

        let response: Response = response.json().await?;
        if response.id != request_id {
            warn!(%request_id, response_id = %response.id, "Response id mismatch");
        }

        trace!(method, %request_id, "HTTP response received");
        response.into_result()
    }
}

// ============================================================================
// Tests
// ============================================================================
