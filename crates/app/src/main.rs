//! Gatecheck - Main Entry Point
//!
//! Builds the default gateway test suite, runs it sequentially against the
//! configured targets and prints a summary. Individual endpoint failures
//! are reported, not fatal; only setup faults end the process with an
//! error.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gatecheck_application::{EndpointVerifier, build_report, build_suite};
use gatecheck_domain::{RunSummary, TestSuite};
use gatecheck_infrastructure::{ConsoleReporter, ReqwestHttpClient, SystemClock, write_json_file};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so they never interleave with the report on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let targets = cli.targets();

    let suite = build_suite(&targets, cli.name.as_deref()).context("invalid gateway base URL")?;

    if cli.list {
        list_suite(&mut io::stdout().lock(), &suite)?;
        return Ok(ExitCode::SUCCESS);
    }

    let client = Arc::new(ReqwestHttpClient::new().context("failed to build HTTP client")?);
    let reporter = Arc::new(ConsoleReporter::stdout());
    let verifier =
        EndpointVerifier::new(client, reporter, targets.clone()).with_config(cli.verifier_config());

    let results = verifier.run_all(&suite).await;
    let summary = verifier.summarize(&results);

    if let Some(path) = &cli.report {
        let report = build_report(&SystemClock::new(), targets, results);
        write_json_file(path, &report)
            .await
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(if fails_run(cli.strict, &summary) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Endpoint failures only fail the process in strict mode.
const fn fails_run(strict: bool, summary: &RunSummary) -> bool {
    strict && !summary.all_passed()
}

fn list_suite(out: &mut impl Write, suite: &TestSuite) -> io::Result<()> {
    for case in suite {
        writeln!(
            out,
            "{:<30} {:<6} {} expects {}",
            case.name(),
            case.method(),
            case.url(),
            case.expected_status()
        )?;
    }
    Ok(())
}
