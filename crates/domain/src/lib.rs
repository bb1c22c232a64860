//! Gatecheck Domain - Core types
//!
//! This crate defines the model for verifying HTTP endpoints exposed by a
//! gateway: test case descriptors, results, and run summaries.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod report;
pub mod request;
pub mod response;
pub mod settings;
pub mod suite;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use id::generate_id_v7;
pub use report::{Failure, RunReport, RunSummary};
pub use request::{Header, HttpMethod, RequestSpec};
pub use response::{DecodeError, PayloadShape, ResponseData, ResponseSpec, StatusCode};
pub use settings::{BACKEND_BASE, GATEWAY_BASE, Targets};
pub use suite::TestSuite;
pub use testing::{ExpectedStatus, TestCase, TestOutcome, TestResult};
