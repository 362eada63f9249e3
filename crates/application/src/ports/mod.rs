//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the test engine and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod session;

pub use session::{Session, TransportError};
