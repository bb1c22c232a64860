//! Outgoing HTTP request types.

mod method;
mod spec;

pub use method::HttpMethod;
pub use spec::{Header, RequestSpec};
