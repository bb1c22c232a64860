//! Endpoint Verifier Use Case
//!
//! Runs each test case of a suite against its target, one at a time, and
//! turns every outcome (answer, wrong status, transport fault) into a
//! `TestResult`. A single endpoint failing never stops the run.

use std::sync::Arc;
use std::time::Duration;

use gatecheck_domain::{
    RequestSpec, RunReport, RunSummary, Targets, TestCase, TestResult, TestSuite,
};
use tracing::{debug, info, warn};

use crate::error::ApplicationResult;
use crate::ports::{Clock, HttpClient, HttpClientError, Reporter};

/// Tunables for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Pause between consecutive requests.
    pub delay: Duration,
    /// Upper bound for each request.
    pub request_timeout: Duration,
}

impl VerifierConfig {
    /// Default pause between requests.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

    /// Sets the inter-request delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            request_timeout: RequestSpec::DEFAULT_TIMEOUT,
        }
    }
}

/// Builds the default gateway suite, keeping only cases whose name starts
/// with `prefix` when one is given.
///
/// # Errors
///
/// Returns an error when the gateway base does not produce valid case URLs.
pub fn build_suite(targets: &Targets, prefix: Option<&str>) -> ApplicationResult<TestSuite> {
    let suite = TestSuite::gateway_default(targets)?;
    Ok(match prefix {
        Some(prefix) => suite.filter_by_prefix(prefix),
        None => suite,
    })
}

/// Packages the results of a run as a report stamped by `clock`.
pub fn build_report<K: Clock + ?Sized>(
    clock: &K,
    targets: Targets,
    results: Vec<TestResult>,
) -> RunReport {
    RunReport::new(targets, results, clock.now())
}

/// Use case for verifying gateway endpoints.
///
/// # Example
///
/// ```ignore
/// let verifier = EndpointVerifier::new(
///     Arc::new(ReqwestHttpClient::new()?),
///     Arc::new(ConsoleReporter::stdout()),
///     Targets::default(),
/// );
/// let suite = TestSuite::gateway_default(verifier.targets())?;
/// let results = verifier.run_all(&suite).await;
/// let summary = verifier.summarize(&results);
/// ```
pub struct EndpointVerifier<C: HttpClient, R: Reporter> {
    client: Arc<C>,
    reporter: Arc<R>,
    targets: Targets,
    config: VerifierConfig,
}

impl<C: HttpClient, R: Reporter> EndpointVerifier<C, R> {
    /// Creates a verifier with the default configuration.
    pub fn new(client: Arc<C>, reporter: Arc<R>, targets: Targets) -> Self {
        Self {
            client,
            reporter,
            targets,
            config: VerifierConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    /// The addresses under test.
    #[must_use]
    pub const fn targets(&self) -> &Targets {
        &self.targets
    }

    /// Executes one test case and reports it.
    ///
    /// Never fails: transport and decode errors become a result with
    /// `passed == false` and `error` set.
    pub async fn execute_one(&self, case: &TestCase) -> TestResult {
        self.reporter.case_started(case);
        let result = self.attempt(case).await;
        self.reporter.case_finished(case, &result);
        result
    }

    /// Executes every case in order, pausing `delay` between them.
    ///
    /// Returns one result per case, in suite order.
    pub async fn run_all(&self, suite: &TestSuite) -> Vec<TestResult> {
        info!(
            gateway = %self.targets.gateway_base,
            cases = suite.len(),
            "starting verification run"
        );
        self.reporter.run_started(&self.targets, suite);

        let mut results = Vec::with_capacity(suite.len());
        for (index, case) in suite.iter().enumerate() {
            if index > 0 && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
            results.push(self.execute_one(case).await);
        }
        results
    }

    /// Aggregates results and reports the summary.
    pub fn summarize(&self, results: &[TestResult]) -> RunSummary {
        let summary = RunSummary::from_results(results);
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "verification run finished"
        );
        self.reporter.run_finished(&self.targets, &summary);
        summary
    }

    async fn attempt(&self, case: &TestCase) -> TestResult {
        let request = match self.build_request(case) {
            Ok(request) => request,
            Err(e) => return TestResult::failed(case, e.to_string()),
        };

        debug!(test = case.name(), method = %request.method, url = %request.url, "sending request");

        let response = match self.client.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(test = case.name(), error = %e, "request failed");
                return TestResult::failed(case, e.to_string());
            }
        };

        match response.decode() {
            Ok(data) => {
                debug!(
                    test = case.name(),
                    status = response.status.as_u16(),
                    elapsed = ?response.duration,
                    "response received"
                );
                TestResult::from_response(case, response.status, response.duration, data)
            }
            Err(e) => {
                warn!(test = case.name(), error = %e, "response could not be decoded");
                TestResult::failed(case, e.to_string())
            }
        }
    }

    /// Builds the outgoing request: JSON headers, and the body unless GET.
    fn build_request(&self, case: &TestCase) -> Result<RequestSpec, HttpClientError> {
        let mut request = RequestSpec::json(case.method(), case.url())
            .with_timeout(self.config.request_timeout);

        if let Some(body) = case.outgoing_body() {
            let payload = serde_json::to_string(body)
                .map_err(|e| HttpClientError::InvalidBody(e.to_string()))?;
            request = request.with_body(payload);
        }

        Ok(request)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use gatecheck_domain::{HttpMethod, ResponseData, ResponseSpec, StatusCode};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::future::Future;
    use std::time::Instant;

    type Canned = Result<(u16, &'static str, &'static str), HttpClientError>;

    /// Mock HTTP client answering from a table keyed by URL path.
    struct MockHttpClient {
        routes: HashMap<&'static str, Canned>,
        fallback: Canned,
        seen: Mutex<Vec<RequestSpec>>,
    }

    impl MockHttpClient {
        fn new(fallback: Canned) -> Self {
            Self {
                routes: HashMap::new(),
                fallback,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn route(mut self, path: &'static str, answer: Canned) -> Self {
            self.routes.insert(path, answer);
            self
        }

        fn requests(&self) -> Vec<RequestSpec> {
            self.seen.lock().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute(
            &self,
            request: &RequestSpec,
        ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
            self.seen.lock().push(request.clone());
            let path = request
                .url
                .trim_start_matches("http://gw.test/tymg")
                .split('?')
                .next()
                .unwrap_or_default();
            let answer = self
                .routes
                .get(path)
                .cloned()
                .unwrap_or_else(|| self.fallback.clone());
            async move {
                let (status, content_type, body) = answer?;
                let headers =
                    HashMap::from([("Content-Type".to_string(), content_type.to_string())]);
                Ok(ResponseSpec::new(
                    status,
                    headers,
                    body.as_bytes().to_vec(),
                    Duration::from_millis(3),
                ))
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        RunStarted(usize),
        Started(String),
        Finished(String, bool),
        RunFinished(usize, usize),
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<Event>>,
    }

    impl Reporter for RecordingReporter {
        fn run_started(&self, _targets: &Targets, suite: &TestSuite) {
            self.events.lock().push(Event::RunStarted(suite.len()));
        }

        fn case_started(&self, case: &TestCase) {
            self.events.lock().push(Event::Started(case.name().to_string()));
        }

        fn case_finished(&self, case: &TestCase, result: &TestResult) {
            self.events
                .lock()
                .push(Event::Finished(case.name().to_string(), result.passed()));
        }

        fn run_finished(&self, _targets: &Targets, summary: &RunSummary) {
            self.events
                .lock()
                .push(Event::RunFinished(summary.passed, summary.failed));
        }
    }

    fn targets() -> Targets {
        Targets::new("http://gw.test/tymg", "http://backend.test/tymb")
    }

    fn verifier(
        client: MockHttpClient,
    ) -> (
        EndpointVerifier<MockHttpClient, RecordingReporter>,
        Arc<MockHttpClient>,
        Arc<RecordingReporter>,
    ) {
        let client = Arc::new(client);
        let reporter = Arc::new(RecordingReporter::default());
        let verifier = EndpointVerifier::new(client.clone(), reporter.clone(), targets())
            .with_config(VerifierConfig::default().with_delay(Duration::ZERO));
        (verifier, client, reporter)
    }

    fn case_named<'a>(suite: &'a TestSuite, name: &str) -> &'a TestCase {
        suite.iter().find(|c| c.name() == name).expect("case exists")
    }

    fn first_expected_client() -> MockHttpClient {
        MockHttpClient::new(Ok((200, "application/json", "[]")))
            .route("/people/get-all", Ok((200, "application/json", "[]")))
            .route("/people/insert", Ok((201, "application/json", r#"{"id":1}"#)))
            .route("/gallery/getAll", Ok((401, "text/plain", "Unauthorized")))
            .route("/deckofcards/blackjack/status", Ok((401, "text/plain", "")))
            .route("/health/consumer", Ok((200, "text/plain", "UP")))
    }

    #[tokio::test]
    async fn test_weapons_200_passes() {
        let (verifier, _, _) = verifier(MockHttpClient::new(Ok((200, "application/json", "[]"))));
        let suite = TestSuite::gateway_default(&targets()).unwrap();

        let result = verifier.execute_one(case_named(&suite, "Weapons - Get All")).await;

        assert!(result.passed());
        assert_eq!(result.status(), Some(StatusCode(200)));
        assert_eq!(result.data(), Some(&ResponseData::Json(serde_json::json!([]))));
        assert_eq!(result.error(), None);
    }

    #[tokio::test]
    async fn test_gallery_401_is_expected() {
        let (verifier, _, _) = verifier(MockHttpClient::new(Ok((401, "text/plain", "no"))));
        let suite = TestSuite::gateway_default(&targets()).unwrap();

        let result = verifier.execute_one(case_named(&suite, "Gallery - Get All")).await;

        assert!(result.passed());
        assert_eq!(result.status(), Some(StatusCode(401)));
    }

    #[tokio::test]
    async fn test_gallery_403_fails_with_status() {
        let (verifier, _, _) = verifier(MockHttpClient::new(Ok((403, "text/plain", "no"))));
        let suite = TestSuite::gateway_default(&targets()).unwrap();

        let result = verifier.execute_one(case_named(&suite, "Gallery - Get All")).await;

        assert!(!result.passed());
        assert_eq!(result.status(), Some(StatusCode(403)));
        assert_eq!(result.error(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_error_result() {
        let refused = HttpClientError::ConnectionRefused {
            host: "gw.test".to_string(),
            port: 80,
        };
        let (verifier, _, reporter) = verifier(MockHttpClient::new(Err(refused)));
        let suite = TestSuite::gateway_default(&targets()).unwrap();

        let results = verifier.run_all(&suite).await;
        let summary = verifier.summarize(&results);

        assert_eq!(results.len(), suite.len());
        for result in &results {
            assert!(!result.passed());
            assert_eq!(result.status(), None);
            assert_eq!(result.error(), Some("connection refused by gw.test:80"));
        }
        assert_eq!(summary.passed, 0);
        assert_eq!(summary.rate_display(), "0.00");
        assert_eq!(
            reporter.events.lock().last(),
            Some(&Event::RunFinished(0, 8))
        );
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_failure_not_empty_data() {
        let (verifier, _, _) =
            verifier(MockHttpClient::new(Ok((200, "application/json", "<html>oops"))));
        let suite = TestSuite::gateway_default(&targets()).unwrap();

        let result = verifier.execute_one(case_named(&suite, "Weapons - Get All")).await;

        assert!(!result.passed());
        assert_eq!(result.status(), None);
        assert!(result.error().unwrap().starts_with("invalid JSON response body"));
    }

    #[tokio::test]
    async fn test_all_first_expected_statuses_pass() {
        let (verifier, _, _) = verifier(first_expected_client());
        let suite = TestSuite::gateway_default(&targets()).unwrap();

        let results = verifier.run_all(&suite).await;
        let summary = verifier.summarize(&results);

        assert_eq!(summary.total, 8);
        assert_eq!(summary.passed, 8);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.rate_display(), "100.00");
        assert!(summary.failures.is_empty());
    }

    #[tokio::test]
    async fn test_results_follow_suite_order_and_invariants() {
        let (verifier, _, reporter) = verifier(
            MockHttpClient::new(Ok((500, "text/plain", "boom")))
                .route("/weapons", Ok((200, "application/json", "[1,2]")))
                .route(
                    "/people/names",
                    Err(HttpClientError::Timeout { timeout_ms: 10 }),
                ),
        );
        let suite = TestSuite::gateway_default(&targets()).unwrap();

        let results = verifier.run_all(&suite).await;

        assert_eq!(results.len(), suite.len());
        for (case, result) in suite.iter().zip(&results) {
            assert_eq!(result.test, case.name());
            assert!(result.status().is_some() != result.error().is_some());
            let expected = result
                .status()
                .is_some_and(|s| case.expected_status().matches(s));
            assert_eq!(result.passed(), expected);
        }

        let events = reporter.events.lock().clone();
        assert_eq!(events.first(), Some(&Event::RunStarted(8)));
        let started: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Started(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        let names: Vec<_> = suite.iter().map(TestCase::name).collect();
        assert_eq!(started, names);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let (verifier, client, _) = verifier(first_expected_client());
        let suite = TestSuite::gateway_default(&targets()).unwrap();

        verifier.run_all(&suite).await;
        let requests = client.requests();

        assert_eq!(requests.len(), 8);
        for request in &requests {
            assert_eq!(request.header("Content-Type"), Some("application/json"));
            assert_eq!(request.header("Accept"), Some("application/json"));
            assert_eq!(request.timeout, RequestSpec::DEFAULT_TIMEOUT);
        }

        let insert = &requests[1];
        assert_eq!(insert.method, HttpMethod::Post);
        let body: serde_json::Value =
            serde_json::from_str(insert.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "TestCharacter",
                "description": "Test",
                "bonus": 10,
                "ability": "Test Ability"
            })
        );
        assert!(requests.iter().filter(|r| r.body.is_some()).count() == 1);
    }

    #[tokio::test]
    async fn test_get_with_body_sends_none() {
        let (verifier, client, _) = verifier(first_expected_client());
        let case = TestCase::new("g", HttpMethod::Get, "http://gw.test/tymg/weapons", [200])
            .unwrap()
            .with_body(serde_json::json!({"ignored": true}))
            .unwrap();

        verifier.execute_one(&case).await;

        assert_eq!(client.requests()[0].body, None);
    }

    #[tokio::test]
    async fn test_idempotent_endpoint_gives_same_outcome() {
        let (verifier, _, _) = verifier(first_expected_client());
        let suite = TestSuite::gateway_default(&targets()).unwrap();
        let weapons = case_named(&suite, "Weapons - Get All");

        let first = verifier.execute_one(weapons).await;
        let second = verifier.execute_one(weapons).await;

        assert_eq!(first.passed(), second.passed());
        assert_eq!(first.status(), second.status());
    }

    #[tokio::test]
    async fn test_delay_is_inserted_between_requests_only() {
        let client = Arc::new(first_expected_client());
        let reporter = Arc::new(RecordingReporter::default());
        let delay = Duration::from_millis(20);
        let verifier = EndpointVerifier::new(client, reporter, targets())
            .with_config(VerifierConfig::default().with_delay(delay));
        let suite = TestSuite::gateway_default(&targets())
            .unwrap()
            .filter_by_prefix("People");

        let start = Instant::now();
        let results = verifier.run_all(&suite).await;

        assert_eq!(results.len(), 4);
        assert!(start.elapsed() >= delay * 3);
    }

    #[tokio::test]
    async fn test_empty_suite() {
        let (verifier, client, _) = verifier(first_expected_client());

        let results = verifier.run_all(&TestSuite::default()).await;
        let summary = verifier.summarize(&results);

        assert!(results.is_empty());
        assert!(client.requests().is_empty());
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_build_suite_filters_by_prefix() {
        let targets = Targets::default();

        assert_eq!(build_suite(&targets, None).unwrap().len(), 8);

        let people = build_suite(&targets, Some("People")).unwrap();
        assert_eq!(people.len(), 4);
        assert!(people.iter().all(|c| c.name().starts_with("People")));
    }

    #[test]
    fn test_build_suite_rejects_relative_base() {
        let targets = Targets::new("localhost/tymg", "http://localhost:8080/tymb");

        let err = build_suite(&targets, None).unwrap_err();

        assert!(matches!(err, crate::ApplicationError::Domain(_)));
    }

    struct FixedClock(chrono::DateTime<chrono::Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> chrono::DateTime<chrono::Utc> {
            self.0
        }
    }

    #[tokio::test]
    async fn test_build_report_uses_clock() {
        let (verifier, _, _) = verifier(first_expected_client());
        let suite = TestSuite::gateway_default(&targets()).unwrap();
        let results = verifier.run_all(&suite).await;
        let stamp = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let report = build_report(&FixedClock(stamp), targets(), results);

        assert_eq!(report.generated_at, stamp);
        assert_eq!(report.targets, targets());
        assert_eq!(report.summary.total, 8);
        assert_eq!(report.results.len(), 8);
        assert!(!report.run_id.is_empty());
    }
}
