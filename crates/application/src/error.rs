//! Case execution error types

use thiserror::Error;

use crate::case::CaseResult;
use crate::expectation::ExpectationError;
use crate::ports::TransportError;

/// Why running a case did not succeed.
#[derive(Debug, Error)]
pub enum CaseError {
    /// The exchange itself failed. The message is the transport's own.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response arrived but its status was not accepted or its body did
    /// not decode. The message is the transport error's own.
    #[error("{error}")]
    Rejected {
        /// Why the response was rejected.
        #[source]
        error: TransportError,
        /// The exchange that was rejected.
        result: Box<CaseResult>,
    },

    /// An expectation did not hold. Later expectations were not evaluated.
    #[error("Failed in test: \"{description}\" Reason: \"{cause}\"")]
    Expectation {
        /// Label of the failing expectation.
        description: String,
        /// Why it failed.
        #[source]
        cause: ExpectationError,
        /// The exchange the expectation was evaluated against.
        result: Box<CaseResult>,
    },
}

impl CaseError {
    /// Returns the exchange, if a response was received.
    #[must_use]
    pub fn result(&self) -> Option<&CaseResult> {
        match self {
            Self::Transport(_) => None,
            Self::Rejected { result, .. } | Self::Expectation { result, .. } => Some(result),
        }
    }

    /// Returns the transport-class error, if the failure happened before
    /// any expectation ran.
    #[must_use]
    pub const fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(error) | Self::Rejected { error, .. } => Some(error),
            Self::Expectation { .. } => None,
        }
    }

    /// Returns true if the failure happened before any expectation ran.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        self.transport_error().is_some()
    }
}

/// Result type alias for running a case.
pub type CaseOutcome = Result<CaseResult, CaseError>;
