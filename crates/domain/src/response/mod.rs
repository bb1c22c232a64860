//! Incoming HTTP response types.

mod data;
mod spec;

pub use data::{DecodeError, PayloadShape, ResponseData, is_json_content_type};
pub use spec::{ResponseSpec, StatusCode};

pub(crate) use spec::duration_millis;
