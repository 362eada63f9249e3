//! The capability a decoded payload needs in order to be assertable.
//!
//! Expectations never look at a concrete payload type. They address the
//! payload as a sequence of items through [`Response`], so a list endpoint
//! and a single-object endpoint are tested with the same expectations.

use serde_json::Value;
use thiserror::Error;

/// Errors reported by a [`Response`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponseError {
    /// The requested item does not exist.
    #[error("index {index} out of range (count {count})")]
    OutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of items in the payload.
        count: usize,
    },

    /// The item failed its validity check.
    #[error("{0}")]
    Invalid(String),

    /// Two items are not equivalent.
    #[error("{0}")]
    Mismatch(String),
}

/// A decoded payload that expectations can be evaluated against.
///
/// Implementations must report a stable [`count`](Response::count) and
/// answer [`get_nth`](Response::get_nth) for every index below it.
pub trait Response {
    /// Number of addressable items: 1 for a single object, N for a collection.
    fn count(&self) -> usize;

    /// Checks the structural or semantic validity of the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the item is invalid.
    fn nth_valid(&self, index: usize) -> Result<(), ResponseError>;

    /// Returns the item at `index` for comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::OutOfRange`] if `index >= count()`.
    fn get_nth(&self, index: usize) -> Result<Value, ResponseError>;

    /// Compares an item of this payload (`actual`) with a caller-supplied
    /// one (`expected`) under the payload's own equivalence rules.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first difference found.
    fn match_items(&self, actual: &Value, expected: &Value) -> Result<(), ResponseError>;
}

/// Arbitrary JSON: an array is a collection, `null` is empty and any
/// other value is a single item.
impl Response for Value {
    fn count(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Null => 0,
            _ => 1,
        }
    }

    fn nth_valid(&self, index: usize) -> Result<(), ResponseError> {
        match self.get_nth(index)? {
            Self::Null => Err(ResponseError::Invalid("item is null".to_string())),
            _ => Ok(()),
        }
    }

    fn get_nth(&self, index: usize) -> Result<Value, ResponseError> {
        let item = match self {
            Self::Array(items) => items.get(index),
            Self::Null => None,
            single => (index == 0).then_some(single),
        };
        item.cloned().ok_or(ResponseError::OutOfRange {
            index,
            count: self.count(),
        })
    }

    fn match_items(&self, actual: &Value, expected: &Value) -> Result<(), ResponseError> {
        match_partial("$", actual, expected).map_err(ResponseError::Mismatch)
    }
}

/// Every field of `expected` must be present in `actual` with a matching
/// value. Fields only present in `actual` are ignored.
fn match_partial(path: &str, actual: &Value, expected: &Value) -> Result<(), String> {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => {
            for (key, want) in expected {
                let field = format!("{path}.{key}");
                let got = actual
                    .get(key)
                    .ok_or_else(|| format!("{field}: missing field"))?;
                match_partial(&field, got, want)?;
            }
            Ok(())
        }
        (Value::Array(actual), Value::Array(expected)) => {
            if actual.len() != expected.len() {
                return Err(format!(
                    "{path}: expected {} items, got {}",
                    expected.len(),
                    actual.len()
                ));
            }
            actual
                .iter()
                .zip(expected)
                .enumerate()
                .try_for_each(|(i, (got, want))| match_partial(&format!("{path}[{i}]"), got, want))
        }
        (got, want) if got == want => Ok(()),
        (got, want) => Err(format!("{path}: expected {want}, got {got}")),
    }
}
