//! # Verifier Configuration
//!
//! Settings shared by every transport a registry builds.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default scheme prepended to log addresses that carry none.
pub const DEFAULT_SCHEME: &str = "https";

/// Verifier configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifierConfig {
    /// User-Agent sent with HTTP requests.
    pub user_agent: String,

    /// Total HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Scheme for log addresses listed without one.
    pub default_scheme: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("ct-log-verifier/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            default_scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl VerifierConfig {
    /// Create a config for testing (short timeouts).
    pub fn for_testing() -> Self {
        Self {
            request_timeout_secs: 2,
            connect_timeout_secs: 1,
            ..Self::default()
        }
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
