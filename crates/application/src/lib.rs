//! RESTit Application - Test cases and ports
//!
//! This crate defines the test engine:
//! - The [`Response`] capability a decoded payload implements
//! - [`Expectation`]s, named predicates over a response
//! - [`Case`], which runs one exchange and evaluates its expectations
//! - [`Tester`], which builds cases for one entry point
//! - The [`Session`] port the exchange is sent through

pub mod case;
pub mod error;
pub mod expectation;
pub mod ports;
pub mod response;
pub mod tester;

pub use case::{Case, CaseResult};
pub use error::{CaseError, CaseOutcome};
pub use expectation::{Expectation, ExpectationError, ExpectationTest};
pub use ports::{Session, TransportError};
pub use response::{Response, ResponseError};
pub use tester::{Endpoint, Tester};
