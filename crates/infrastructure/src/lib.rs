//! RESTit Infrastructure - Adapters and implementations
//!
//! This crate provides the concrete transport behind the `Session` port
//! defined in the application layer, and its configuration.

pub mod adapters;
pub mod config;

pub use adapters::ReqwestSession;
pub use config::{ConfigError, SessionConfig};
