//! Transport adapters implementing the session port.

mod reqwest_session;

pub use reqwest_session::ReqwestSession;
