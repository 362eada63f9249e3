//! Session implementation using reqwest.
//!
//! This adapter implements the `Session` port using the reqwest library.
//! It performs the exchange and hands back the raw response; decoding and
//! status policy belong to the case.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use restit_application::ports::{Session, TransportError};
use restit_domain::{HttpMethod, RequestSpec, ResponseSpec};
use tracing::debug;

use crate::config::SessionConfig;

/// Session implementation using reqwest.
///
/// Cloning is cheap: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestSession {
    client: Client,
    timeout_ms: Option<u64>,
}

impl ReqwestSession {
    /// Creates a session with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&SessionConfig::default())
    }

    /// Creates a session from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a default header is malformed or the client
    /// cannot be created.
    pub fn with_config(config: &SessionConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .default_headers(Self::header_map(&config.default_headers)?);

        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            timeout_ms: config.timeout_ms,
        })
    }

    /// Creates a session around an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout_ms: None,
        }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
        headers
            .iter()
            .map(|(name, value)| -> Result<_, TransportError> {
                let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    TransportError::Other(format!("invalid header name '{name}': {e}"))
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    TransportError::Other(format!("invalid value for header '{name}': {e}"))
                })?;
                Ok((name, value))
            })
            .collect()
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: self.timeout_ms.unwrap_or_default(),
            };
        }
        if error.is_connect() {
            return TransportError::ConnectionFailed(error.to_string());
        }
        if error.is_builder() {
            return TransportError::InvalidUrl(error.to_string());
        }
        TransportError::Other(error.to_string())
    }
}

impl Session for ReqwestSession {
    fn send(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, TransportError>> + Send {
        // Clone what we need to move into the async block
        let method = request.method;
        let url = request.full_url();
        let body = request.body.clone();

        async move {
            let url = url?;
            let start = Instant::now();

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(method), url.clone());
            if let Some(body) = &body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(|e| self.map_error(&e))?;
            let status = response.status().as_u16();
            let headers: Vec<(String, String)> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Other(format!("failed to read body: {e}")))?
                .to_vec();
            let duration = start.elapsed();

            debug!(%method, %url, status, bytes = body.len(), ?duration, "exchange completed");
            Ok(ResponseSpec::new(status, headers, body, duration))
        }
    }
}
