//! Gatecheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod serialization;

pub use adapters::{ConsoleReporter, ReqwestHttpClient, SystemClock};
pub use serialization::{SerializationError, from_json, to_json_pretty, write_json_file};
