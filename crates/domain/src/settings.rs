//! Target addresses for a verification run.

use serde::{Deserialize, Serialize};

/// Default gateway entry point.
pub const GATEWAY_BASE: &str = "http://localhost:8082/tymg";

/// Default backend address, reported but never called directly.
pub const BACKEND_BASE: &str = "http://localhost:8080/tymb";

/// Base URLs of the system under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    /// Gateway base URL; every default test case is relative to it.
    pub gateway_base: String,
    /// Backend base URL, for reporting only.
    pub backend_base: String,
}

impl Default for Targets {
    fn default() -> Self {
        Self::new(GATEWAY_BASE, BACKEND_BASE)
    }
}

impl Targets {
    /// Creates targets from explicit base URLs.
    #[must_use]
    pub fn new(gateway_base: impl Into<String>, backend_base: impl Into<String>) -> Self {
        Self {
            gateway_base: gateway_base.into(),
            backend_base: backend_base.into(),
        }
    }

    /// Joins a path onto the gateway base with exactly one `/` between them.
    #[must_use]
    pub fn gateway_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.gateway_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Port the gateway listens on, if the base URL names one.
    #[must_use]
    pub fn gateway_port(&self) -> Option<u16> {
        port_of(&self.gateway_base)
    }

    /// Port the backend listens on, if the base URL names one.
    #[must_use]
    pub fn backend_port(&self) -> Option<u16> {
        port_of(&self.backend_base)
    }
}

fn port_of(base: &str) -> Option<u16> {
    url::Url::parse(base).ok()?.port_or_known_default()
}
