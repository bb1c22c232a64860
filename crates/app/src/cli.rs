//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use gatecheck_application::VerifierConfig;
use gatecheck_domain::{BACKEND_BASE, GATEWAY_BASE, Targets};

#[derive(Debug, Parser)]
#[command(version, about, name = "gatecheck", long_about = None)]
pub struct Cli {
    /// Gateway base URL; every test path is relative to it.
    #[arg(long, default_value = GATEWAY_BASE, env = "GATECHECK_GATEWAY_BASE")]
    pub gateway_base: String,
    /// Backend base URL, shown in the report only.
    #[arg(long, default_value = BACKEND_BASE, env = "GATECHECK_BACKEND_BASE")]
    pub backend_base: String,
    /// Pause between requests, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,
    /// Per-request timeout, in milliseconds.
    #[arg(long, default_value_t = 30_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: u64,
    /// Only run tests whose name starts with this prefix.
    #[arg(long)]
    pub name: Option<String>,
    /// Print the test cases and exit without sending requests.
    #[arg(long)]
    pub list: bool,
    /// Also write the results as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Exit with a failure code when any test fails.
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    pub fn targets(&self) -> Targets {
        Targets::new(&self.gateway_base, &self.backend_base)
    }

    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig::default()
            .with_delay(Duration::from_millis(self.delay_ms))
            .with_request_timeout(Duration::from_millis(self.timeout_ms))
    }
}
