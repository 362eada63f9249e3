//! RESTit Domain - Core data types
//!
//! This crate defines the request and response model exchanged between
//! a test case and its transport. All types here are pure Rust with no
//! I/O dependencies.

pub mod error;
pub mod request;
pub mod response;

pub use error::{DomainError, DomainResult};
pub use request::{HttpMethod, QueryParam, QueryParams, RequestSpec};
pub use response::{ResponseSpec, StatusCode, StatusExpectation};
