//! Named assertions over a decoded response.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::response::{Response, ResponseError};

/// Why an expectation did not hold.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpectationError {
    /// The payload has the wrong number of items.
    #[error("Result count is {actual} (expected {expected})")]
    ResultCount {
        /// Number of items in the payload.
        actual: usize,
        /// Number the expectation was built with.
        expected: usize,
    },

    /// An item failed its validity check.
    #[error("Item {index} invalid: {source}")]
    InvalidItem {
        /// Index of the first invalid item.
        index: usize,
        /// The validity error reported by the payload.
        source: ResponseError,
    },

    /// The payload reported an error while being inspected.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A caller-defined check failed.
    #[error("{0}")]
    Failed(String),
}

impl ExpectationError {
    /// Creates a failure for a caller-defined check.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// The predicate an [`Expectation`] evaluates.
pub type ExpectationTest = dyn Fn(&dyn Response) -> Result<(), ExpectationError> + Send + Sync;

/// A named predicate evaluated against a decoded response.
pub struct Expectation {
    desc: String,
    test: Box<ExpectationTest>,
}

impl Expectation {
    /// Creates an expectation from a description and a predicate.
    pub fn new<F>(desc: impl Into<String>, test: F) -> Self
    where
        F: Fn(&dyn Response) -> Result<(), ExpectationError> + Send + Sync + 'static,
    {
        Self {
            desc: desc.into(),
            test: Box::new(test),
        }
    }

    /// Passes if the response holds exactly `n` items.
    #[must_use]
    pub fn result_count(n: usize) -> Self {
        Self::new("Test Result Count", move |r| {
            let count = r.count();
            if count == n {
                Ok(())
            } else {
                Err(ExpectationError::ResultCount {
                    actual: count,
                    expected: n,
                })
            }
        })
    }

    /// Passes if the response does not hold exactly `n` items.
    #[must_use]
    pub fn result_count_not(n: usize) -> Self {
        Self::new("Test Result Count", move |r| {
            let count = r.count();
            if count == n {
                Err(ExpectationError::ResultCount {
                    actual: count,
                    expected: n,
                })
            } else {
                Ok(())
            }
        })
    }

    /// Passes if every item of the response is valid. Stops at the first
    /// invalid item.
    #[must_use]
    pub fn results_valid() -> Self {
        Self::new("Test Results Valid", |r| {
            (0..r.count()).try_for_each(|index| {
                r.nth_valid(index)
                    .map_err(|source| ExpectationError::InvalidItem { index, source })
            })
        })
    }

    /// Passes if item `n` exists and matches `expected` under the
    /// response's own matching rules.
    #[must_use]
    pub fn result_nth(n: usize, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        Self::new(format!("Test #{n} Result Valid"), move |r| {
            let actual = r.get_nth(n)?;
            r.match_items(&actual, &expected)?;
            Ok(())
        })
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Evaluates the expectation against a response.
    ///
    /// # Errors
    ///
    /// Returns the reason the expectation does not hold.
    pub fn test(&self, response: &dyn Response) -> Result<(), ExpectationError> {
        (self.test)(response)
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}
