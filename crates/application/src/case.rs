//! Test case: one HTTP exchange plus its ordered expectations.
//!
//! A case is configured through chained `with_*` and `expect_*` calls and
//! then run. Running sends the request, decodes the body into the case's
//! response type and evaluates the expectations in the order they were
//! added, stopping at the first one that fails.

use std::marker::PhantomData;
use std::sync::Arc;

use restit_domain::{QueryParams, RequestSpec, ResponseSpec, StatusExpectation};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CaseError, CaseOutcome};
use crate::expectation::{Expectation, ExpectationError};
use crate::ports::{Session, TransportError};
use crate::response::Response;
use crate::tester::Endpoint;

/// The outcome of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    /// The raw transport response.
    pub response: ResponseSpec,
}

/// One configured HTTP exchange and the expectations to check against it.
///
/// `R` is the type the response body is decoded into before the
/// expectations run. It defaults to arbitrary JSON and is changed with
/// [`with_response_as`](Case::with_response_as).
pub struct Case<S, R = Value> {
    request: RequestSpec,
    session: S,
    expectations: Vec<Expectation>,
    accepted_status: StatusExpectation,
    endpoint: Option<Arc<Endpoint>>,
    response_as: PhantomData<fn() -> R>,
}

impl<S: Session> Case<S> {
    /// Creates a case that sends `request` through `session`.
    #[must_use]
    pub fn new(request: RequestSpec, session: S) -> Self {
        Self {
            request,
            session,
            expectations: Vec::new(),
            accepted_status: StatusExpectation::success(),
            endpoint: None,
            response_as: PhantomData,
        }
    }
}

impl<S, R> Case<S, R> {
    /// Records the endpoint this case was built for.
    #[must_use]
    pub(crate) fn with_endpoint(mut self, endpoint: Arc<Endpoint>) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Decodes the response body into `T` instead of the current type.
    ///
    /// Expectations added so far are kept.
    #[must_use]
    pub fn with_response_as<T>(self) -> Case<S, T>
    where
        T: Response + DeserializeOwned,
    {
        Case {
            request: self.request,
            session: self.session,
            expectations: self.expectations,
            accepted_status: self.accepted_status,
            endpoint: self.endpoint,
            response_as: PhantomData,
        }
    }

    /// Sets the query string parameters.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.request.params = params;
        self
    }

    /// Sets which status codes count as a successful exchange (2xx by default).
    #[must_use]
    pub fn expect_status(mut self, accepted: StatusExpectation) -> Self {
        self.accepted_status = accepted;
        self
    }

    /// Appends an expectation.
    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Expects the response to hold exactly `n` items.
    #[must_use]
    pub fn expect_result_count(self, n: usize) -> Self {
        self.expect(Expectation::result_count(n))
    }

    /// Expects the response not to hold exactly `n` items.
    #[must_use]
    pub fn expect_result_count_not(self, n: usize) -> Self {
        self.expect(Expectation::result_count_not(n))
    }

    /// Expects every item of the response to be valid.
    #[must_use]
    pub fn expect_results_valid(self) -> Self {
        self.expect(Expectation::results_valid())
    }

    /// Expects item `n` to exist and match `expected`.
    #[must_use]
    pub fn expect_result_nth(self, n: usize, expected: impl Into<Value>) -> Self {
        self.expect(Expectation::result_nth(n, expected))
    }

    /// Expects the response to pass a caller-defined check.
    #[must_use]
    pub fn expect_results_to_pass<F>(self, desc: impl Into<String>, test: F) -> Self
    where
        F: Fn(&dyn Response) -> Result<(), ExpectationError> + Send + Sync + 'static,
    {
        self.expect(Expectation::new(desc, test))
    }

    /// Returns the request this case sends.
    #[must_use]
    pub const fn request(&self) -> &RequestSpec {
        &self.request
    }

    /// Returns the session the request is sent through.
    #[must_use]
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Returns the expectations in evaluation order.
    #[must_use]
    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// Returns the endpoint this case was built for, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_deref()
    }

    fn endpoint_name(&self) -> &str {
        self.endpoint.as_deref().map_or("", |e| e.name.as_str())
    }
}

impl<S, R> Case<S, R>
where
    S: Session,
    R: Response + DeserializeOwned,
{
    /// Sends the request and evaluates the expectations in order.
    ///
    /// Every call performs a fresh exchange.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Transport`] if the exchange failed,
    /// [`CaseError::Rejected`] if the status was not accepted or the body
    /// could not be decoded, and [`CaseError::Expectation`] for the first
    /// expectation that does not hold.
    #[tracing::instrument(
        name = "case",
        skip_all,
        fields(
            request_id = %self.request.id,
            method = %self.request.method,
            url = %self.request.url,
            endpoint = self.endpoint_name()
        )
    )]
    pub async fn run(&self) -> CaseOutcome {
        let response = self
            .session
            .send(&self.request)
            .await
            .inspect_err(|e| warn!(error = %e, "exchange failed"))?;

        let payload = match self.decode(&response) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, status = %response.status, "response rejected");
                return Err(CaseError::Rejected {
                    error,
                    result: Box::new(CaseResult { response }),
                });
            }
        };
        let result = CaseResult { response };

        for expectation in &self.expectations {
            if let Err(cause) = expectation.test(&payload) {
                debug!(expectation = expectation.desc(), reason = %cause, "expectation failed");
                return Err(CaseError::Expectation {
                    description: expectation.desc().to_string(),
                    cause,
                    result: Box::new(result),
                });
            }
        }

        debug!(expectations = self.expectations.len(), "all expectations passed");
        Ok(result)
    }

    /// Runs the case and panics if it fails.
    ///
    /// # Panics
    ///
    /// Panics with the error message of [`run`](Case::run) on any failure.
    #[allow(clippy::panic)]
    pub async fn run_or_panic(&self) -> CaseResult {
        match self.run().await {
            Ok(result) => result,
            Err(e) => panic!("{e}"),
        }
    }

    fn decode(&self, response: &ResponseSpec) -> Result<R, TransportError> {
        if !self.accepted_status.matches(response.status) {
            return Err(TransportError::UnexpectedStatus {
                status: response.status.as_u16(),
                expected: self.accepted_status.description(),
            });
        }

        let decoded = if response.is_body_empty() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&response.body)
        };
        decoded.map_err(|e| TransportError::Decode(e.to_string()))
    }
}
