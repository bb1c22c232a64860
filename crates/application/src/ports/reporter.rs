//! Reporting port

use gatecheck_domain::{RunSummary, Targets, TestCase, TestResult, TestSuite};

/// Receives progress and results as a run unfolds.
///
/// Every test case produces exactly one `case_started` followed by exactly
/// one `case_finished`, in suite order.
pub trait Reporter: Send + Sync {
    /// Called once before the first request.
    fn run_started(&self, targets: &Targets, suite: &TestSuite);

    /// Called before a case's request is issued.
    fn case_started(&self, case: &TestCase);

    /// Called with the case's result.
    fn case_finished(&self, case: &TestCase, result: &TestResult);

    /// Called with the aggregate once all cases ran.
    fn run_finished(&self, targets: &Targets, summary: &RunSummary);
}
