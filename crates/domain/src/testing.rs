//! Test case descriptors and their outcomes.
//!
//! A [`TestCase`] describes one HTTP call and the status codes it may
//! return. Executing it yields a [`TestResult`], which holds either the
//! observed response or the reason the call could not be made.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::request::HttpMethod;
use crate::response::{ResponseData, StatusCode, duration_millis};

/// Non-empty set of acceptable status codes, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpectedStatus(Vec<StatusCode>);

impl ExpectedStatus {
    /// Builds the set, dropping duplicates. Returns `None` when empty.
    #[must_use]
    pub fn one_of(codes: impl IntoIterator<Item = u16>) -> Option<Self> {
        let mut set: Vec<StatusCode> = Vec::new();
        for code in codes.into_iter().map(StatusCode::new) {
            if !set.contains(&code) {
                set.push(code);
            }
        }
        (!set.is_empty()).then_some(Self(set))
    }

    /// Checks membership.
    #[must_use]
    pub fn matches(&self, status: StatusCode) -> bool {
        self.0.contains(&status)
    }

    /// All codes in declaration order.
    #[must_use]
    pub fn codes(&self) -> &[StatusCode] {
        &self.0
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<_> = self.0.iter().map(|c| c.as_u16().to_string()).collect();
        write!(f, "[{}]", codes.join(", "))
    }
}

/// A descriptor for one verification attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    name: String,
    method: HttpMethod,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Map<String, Value>>,
    expected_status: ExpectedStatus,
    description: String,
}

impl TestCase {
    /// Creates a test case without body or description.
    ///
    /// # Errors
    ///
    /// Fails when `url` is not an absolute http(s) URL or when `expected`
    /// is empty.
    pub fn new(
        name: impl Into<String>,
        method: HttpMethod,
        url: impl Into<String>,
        expected: impl IntoIterator<Item = u16>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let url = url.into();

        let parsed = Url::parse(&url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {url}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{}': {url}",
                parsed.scheme()
            )));
        }

        let expected_status = ExpectedStatus::one_of(expected)
            .ok_or_else(|| DomainError::EmptyExpectedStatus(name.clone()))?;

        Ok(Self {
            name,
            method,
            url,
            body: None,
            expected_status,
            description: String::new(),
        })
    }

    /// Attaches a JSON object payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` when `body` is not a JSON object.
    pub fn with_body(mut self, body: Value) -> DomainResult<Self> {
        match body {
            Value::Object(map) => {
                self.body = Some(map);
                Ok(self)
            }
            other => Err(DomainError::InvalidBody(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Sets the call-chain annotation.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Human-readable identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTP verb.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Fully qualified target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Configured payload, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref()
    }

    /// Payload that is actually sent: GET never carries one.
    #[must_use]
    pub fn outgoing_body(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref().filter(|_| self.method.sends_body())
    }

    /// Acceptable status codes.
    #[must_use]
    pub const fn expected_status(&self) -> &ExpectedStatus {
        &self.expected_status
    }

    /// Call-chain annotation, documentation only.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// What happened when a test case was executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TestOutcome {
    /// The target answered.
    Response {
        /// Observed status code.
        status: StatusCode,
        /// Reason phrase for the status.
        status_text: String,
        /// Elapsed time for the call.
        #[serde(rename = "duration_ms", with = "duration_millis")]
        duration: Duration,
        /// Decoded body.
        data: ResponseData,
    },
    /// The call could not be completed.
    Error {
        /// Human-readable cause.
        message: String,
    },
}

/// Outcome of executing one [`TestCase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTestResult")]
pub struct TestResult {
    /// Name of the originating test case.
    pub test: String,
    passed: bool,
    #[serde(flatten)]
    outcome: TestOutcome,
}

/// Wire form of [`TestResult`], checked before it becomes one.
#[derive(Deserialize)]
struct RawTestResult {
    test: String,
    passed: bool,
    #[serde(flatten)]
    outcome: TestOutcome,
}

impl TryFrom<RawTestResult> for TestResult {
    type Error = DomainError;

    fn try_from(raw: RawTestResult) -> Result<Self, Self::Error> {
        if raw.passed && matches!(raw.outcome, TestOutcome::Error { .. }) {
            return Err(DomainError::InconsistentResult(raw.test));
        }
        Ok(Self {
            test: raw.test,
            passed: raw.passed,
            outcome: raw.outcome,
        })
    }
}

impl TestResult {
    /// Records an answered call; `passed` is derived from the case.
    #[must_use]
    pub fn from_response(
        case: &TestCase,
        status: StatusCode,
        duration: Duration,
        data: ResponseData,
    ) -> Self {
        Self {
            test: case.name().to_string(),
            passed: case.expected_status().matches(status),
            outcome: TestOutcome::Response {
                status,
                status_text: status.reason_phrase().to_string(),
                duration,
                data,
            },
        }
    }

    /// Records a call that could not be completed.
    #[must_use]
    pub fn failed(case: &TestCase, message: impl Into<String>) -> Self {
        Self {
            test: case.name().to_string(),
            passed: false,
            outcome: TestOutcome::Error {
                message: message.into(),
            },
        }
    }

    /// True iff the observed status is in the expected set.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// The full outcome.
    #[must_use]
    pub const fn outcome(&self) -> &TestOutcome {
        &self.outcome
    }

    /// Observed status, absent on failure.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match &self.outcome {
            TestOutcome::Response { status, .. } => Some(*status),
            TestOutcome::Error { .. } => None,
        }
    }

    /// Failure cause, absent when the target answered.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            TestOutcome::Error { message } => Some(message.as_str()),
            TestOutcome::Response { .. } => None,
        }
    }

    /// Elapsed time, absent on failure.
    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        match &self.outcome {
            TestOutcome::Response { duration, .. } => Some(*duration),
            TestOutcome::Error { .. } => None,
        }
    }

    /// Decoded body, absent on failure.
    #[must_use]
    pub const fn data(&self) -> Option<&ResponseData> {
        match &self.outcome {
            TestOutcome::Response { data, .. } => Some(data),
            TestOutcome::Error { .. } => None,
        }
    }

    /// Short failure cause for summaries: the error, or the observed status.
    #[must_use]
    pub fn cause(&self) -> String {
        match &self.outcome {
            TestOutcome::Error { message } => message.clone(),
            TestOutcome::Response { status, .. } => format!("Status: {}", status.as_u16()),
        }
    }
}
