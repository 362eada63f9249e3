//! RESTit - declarative test cases for RESTful API endpoints
//!
//! Build a [`Tester`] for an entry point, create a [`Case`] for one of its
//! operations, chain the expectations and run it:
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let users = restit::rest("Users", "https://api.example.com/users")?;
//!
//! users
//!     .retrieve(42)
//!     .expect_result_count(1)
//!     .expect_results_valid()
//!     .expect_result_nth(0, serde_json::json!({ "id": 42 }))
//!     .run()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! A failing expectation is reported as
//! `Failed in test: "<description>" Reason: "<cause>"`.

pub use restit_application::{
    Case, CaseError, CaseOutcome, CaseResult, Endpoint, Expectation, ExpectationError, Response,
    ResponseError, Session, Tester, TransportError,
};
pub use restit_domain::{
    DomainError, HttpMethod, QueryParam, QueryParams, RequestSpec, ResponseSpec, StatusCode,
    StatusExpectation,
};
pub use restit_infrastructure::{ConfigError, ReqwestSession, SessionConfig};

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Why a tester could not be set up.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The transport configuration is invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be created.
    #[error("{0}")]
    Transport(#[from] TransportError),
}

/// Creates a tester for an entry point using the default HTTP transport
/// configured from the `RESTIT_*` environment variables.
///
/// # Errors
///
/// Returns [`SetupError::Config`] if the environment holds an invalid
/// setting and [`SetupError::Transport`] if the HTTP client cannot be
/// created.
pub fn rest(
    name: impl Into<String>,
    url: impl Into<String>,
) -> Result<Tester<ReqwestSession>, SetupError> {
    rest_with_config(name, url, &SessionConfig::from_env()?)
}

/// Creates a tester for an entry point with an explicit transport configuration.
///
/// # Errors
///
/// Returns [`SetupError::Transport`] if the HTTP client cannot be created.
pub fn rest_with_config(
    name: impl Into<String>,
    url: impl Into<String>,
    config: &SessionConfig,
) -> Result<Tester<ReqwestSession>, SetupError> {
    Ok(Tester::new(name, url, ReqwestSession::with_config(config)?))
}

/// Installs a formatting subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already installed, so it is safe
/// to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
