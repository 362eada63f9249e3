//! Request specification type

use serde::Serialize;
use url::Url;
use uuid::Uuid;

use super::{HttpMethod, QueryParams};
use crate::error::{DomainError, DomainResult};

/// Complete specification for one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Unique identifier for this request
    pub id: Uuid,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL without query string parameters
    pub url: String,
    /// Query string parameters appended when the request is sent
    pub params: QueryParams,
    /// JSON payload, if any
    pub body: Option<serde_json::Value>,
}

impl RequestSpec {
    /// Creates a request without a payload.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            url: url.into(),
            params: QueryParams::new(),
            body: None,
        }
    }

    /// Creates a request carrying `payload` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] if the payload cannot be
    /// represented as JSON (for example a map with non-string keys).
    pub fn with_payload<P: Serialize + ?Sized>(
        method: HttpMethod,
        url: impl Into<String>,
        payload: &P,
    ) -> DomainResult<Self> {
        let body =
            serde_json::to_value(payload).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        let mut request = Self::new(method, url);
        request.body = Some(body);
        Ok(request)
    }

    /// Returns the URL with the query parameters encoded into it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the URL is malformed.
    pub fn full_url(&self) -> DomainResult<Url> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.url)))?;
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.pairs());
        }
        Ok(url)
    }
}
