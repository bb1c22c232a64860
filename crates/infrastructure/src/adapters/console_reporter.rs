//! Human-readable console output.

use std::io::{self, Write};

use gatecheck_application::ports::Reporter;
use gatecheck_domain::{
    PayloadShape, RunSummary, Targets, TestCase, TestOutcome, TestResult, TestSuite,
};
use parking_lot::Mutex;

const RULE_WIDTH: usize = 80;
const PREVIEW_CHARS: usize = 200;

/// Writes progress blocks and the final summary to a text sink.
///
/// Write failures are logged and otherwise ignored; output problems must
/// not change the outcome of a run.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Reporter printing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consumes the reporter and returns the sink.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, render: impl FnOnce(&mut W) -> io::Result<()>) {
        let mut out = self.out.lock();
        if let Err(e) = render(&mut *out).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to write report output");
        }
    }
}

impl<W: Write + Send + AsRef<[u8]>> ConsoleReporter<W> {
    /// Everything written so far, for in-memory sinks.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(self.out.lock().as_ref()).into_owned()
    }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn write_case_header(out: &mut impl Write, case: &TestCase) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "Test:     {}", case.name())?;
    writeln!(out, "URL:      {}", case.url())?;
    writeln!(out, "Method:   {}", case.method())?;
    writeln!(out, "Flow:     {}", case.description())?;
    writeln!(out, "{}", rule())
}

fn write_result(out: &mut impl Write, case: &TestCase, result: &TestResult) -> io::Result<()> {
    match result.outcome() {
        TestOutcome::Error { message } => {
            writeln!(out)?;
            writeln!(out, "[FAIL] network error")?;
            writeln!(out, "Error:    {message}")
        }
        TestOutcome::Response {
            status,
            status_text,
            duration,
            data,
        } => {
            writeln!(out)?;
            writeln!(out, "{}", if result.passed() { "[PASS]" } else { "[FAIL]" })?;
            writeln!(out, "Status:   {} {status_text}", status.as_u16())?;
            writeln!(out, "Time:     {}ms", duration.as_millis())?;
            if !result.passed() {
                writeln!(out, "Expected: {}", case.expected_status())?;
            }

            if status.is_success() {
                writeln!(out, "Gateway forwarded the request to the backend")?;
                match data.shape() {
                    Some(PayloadShape::Array(len)) => {
                        writeln!(out, "Payload:  Array ({len} items)")?;
                    }
                    Some(PayloadShape::Object) => writeln!(out, "Payload:  Object")?,
                    Some(PayloadShape::Scalar) | None => {}
                }
                Ok(())
            } else {
                writeln!(out, "Preview:  {}", data.preview(PREVIEW_CHARS))
            }
        }
    }
}

fn write_summary(out: &mut impl Write, targets: &Targets, summary: &RunSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "Summary")?;
    writeln!(out, "{}", rule())?;
    writeln!(out)?;
    writeln!(out, "Total:        {}", summary.total)?;
    writeln!(out, "Passed:       {}", summary.passed)?;
    writeln!(out, "Failed:       {}", summary.failed)?;
    writeln!(out, "Success rate: {}%", summary.rate_display())?;

    if summary.all_passed() {
        writeln!(out)?;
        writeln!(out, "All tests passed. Gateway routes are forwarding to the backend.")?;
    } else {
        writeln!(out)?;
        writeln!(out, "Some tests failed. Check:")?;
        writeln!(out, "  - is the backend running?{}", port_hint(targets.backend_port()))?;
        writeln!(out, "  - is the gateway running?{}", port_hint(targets.gateway_port()))?;
        writeln!(out, "  - is the route configuration correct?")?;
        writeln!(out)?;
        writeln!(out, "Failed tests:")?;
        for failure in &summary.failures {
            writeln!(out, "  - {} - {}", failure.test, failure.cause)?;
        }
    }
    writeln!(out)
}

fn port_hint(port: Option<u16>) -> String {
    port.map(|p| format!(" (port {p})")).unwrap_or_default()
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn run_started(&self, targets: &Targets, suite: &TestSuite) {
        self.emit(|out| {
            writeln!(out)?;
            writeln!(out, "Starting gateway verification")?;
            writeln!(out)?;
            writeln!(out, "Gateway: {}", targets.gateway_base)?;
            writeln!(out, "Backend: {}", targets.backend_base)?;
            writeln!(out, "Tests:   {}", suite.len())?;
            writeln!(out)?;
            writeln!(out, "Architecture:")?;
            writeln!(out, "  client -> gateway (HTTP routes)")?;
            writeln!(out, "         -> backend REST controllers")?;
            writeln!(out, "         -> database")
        });
    }

    fn case_started(&self, case: &TestCase) {
        self.emit(|out| write_case_header(out, case));
    }

    fn case_finished(&self, case: &TestCase, result: &TestResult) {
        self.emit(|out| write_result(out, case, result));
    }

    fn run_finished(&self, targets: &Targets, summary: &RunSummary) {
        self.emit(|out| write_summary(out, targets, summary));
    }
}
