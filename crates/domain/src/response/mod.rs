//! Response types

mod spec;
mod status;

pub use spec::{ResponseSpec, StatusCode};
pub use status::StatusExpectation;
