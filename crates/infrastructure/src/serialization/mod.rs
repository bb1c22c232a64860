//! JSON serialization for run reports.

mod json;

pub use json::*;
