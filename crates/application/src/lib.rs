//! Gatecheck Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP client, reporter, clock)
//! - The endpoint verifier use case
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod verifier;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{Clock, HttpClient, HttpClientError, Reporter};
pub use verifier::{EndpointVerifier, VerifierConfig, build_report, build_suite};
