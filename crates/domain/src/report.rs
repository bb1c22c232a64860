//! Aggregation of test results into a run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id_v7;
use crate::settings::Targets;
use crate::testing::TestResult;

/// One failing test case and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Test case name.
    pub test: String,
    /// Error message, or `Status: <code>` for a status mismatch.
    pub cause: String,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of results.
    pub total: usize,
    /// Results that passed.
    pub passed: usize,
    /// Results that failed.
    pub failed: usize,
    /// `passed / total * 100`, rounded to two decimals; 0 for an empty run.
    pub success_rate: f64,
    /// Failing cases in run order.
    pub failures: Vec<Failure>,
}

impl RunSummary {
    /// Summarizes a sequence of results.
    #[must_use]
    pub fn from_results(results: &[TestResult]) -> Self {
        let total = results.len();
        let failures: Vec<Failure> = results
            .iter()
            .filter(|r| !r.passed())
            .map(|r| Failure {
                test: r.test.clone(),
                cause: r.cause(),
            })
            .collect();
        let failed = failures.len();
        let passed = total - failed;

        Self {
            total,
            passed,
            failed,
            success_rate: success_rate(passed, total),
            failures,
        }
    }

    /// True when nothing failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Success rate formatted with two decimals, e.g. `87.50`.
    #[must_use]
    pub fn rate_display(&self) -> String {
        format!("{:.2}", self.success_rate)
    }
}

#[allow(clippy::cast_precision_loss)]
fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = passed as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Machine-readable record of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique, time-sortable run identifier.
    pub run_id: String,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Addresses that were exercised.
    pub targets: Targets,
    /// Aggregate counts.
    pub summary: RunSummary,
    /// Every result in run order.
    pub results: Vec<TestResult>,
}

impl RunReport {
    /// Builds a report, computing the summary from `results`.
    #[must_use]
    pub fn new(targets: Targets, results: Vec<TestResult>, generated_at: DateTime<Utc>) -> Self {
        Self {
            run_id: generate_id_v7(),
            generated_at,
            targets,
            summary: RunSummary::from_results(&results),
            results,
        }
    }
}
