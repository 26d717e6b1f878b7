//! # Log Registry
//!
//! Builds one `LogState` per log-list entry and indexes them by the SHA-256
//! of the log's public key, which is also the `log_id` carried by its SCTs.
//!
//! Construction is all-or-nothing: the first entry that cannot be built
//! aborts the batch with a `LogConfig` error naming that log.

use crate::adapters::{DnsLogClient, HttpLogClient};
use crate::application::LogState;
use crate::config::VerifierConfig;
use crate::domain::{CtError, KeyHash, LogIdentity, LogListEntry, SignedCertificateTimestamp};
use crate::ports::{LogClient, TxtResolver};
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Produces the transport for one log.
pub trait LogClientFactory: Send + Sync {
    /// Build a client for `identity`.
    ///
    /// # Errors
    /// - `LogConfig` if the identity does not describe a reachable log
    fn create(&self, identity: &LogIdentity) -> Result<Arc<dyn LogClient>, CtError>;
}

/// Add `default_scheme` to an address that has none. Explicit `http` and
/// `https` schemes are kept as listed.
pub fn normalize_url(url: &str, default_scheme: &str) -> Result<Url, String> {
    let candidate = if url.contains("://") {
        url.to_string()
    } else {
        format!("{default_scheme}://{url}")
    };
    let parsed = Url::parse(&candidate).map_err(|e| format!("invalid log URL {url:?}: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(format!("unsupported scheme {other:?} in log URL {url:?}")),
    }
}

/// RFC 6962 HTTP transport factory sharing one connection pool.
#[derive(Clone, Debug)]
pub struct HttpClientFactory {
    http: reqwest::Client,
    default_scheme: String,
}

impl HttpClientFactory {
    /// Build the shared HTTP client from `config`.
    pub fn new(config: &VerifierConfig) -> Result<Self, CtError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| CtError::config("<http client>", format!("failed to build: {e}")))?;
        Ok(Self {
            http,
            default_scheme: config.default_scheme.clone(),
        })
    }
}

impl LogClientFactory for HttpClientFactory {
    fn create(&self, identity: &LogIdentity) -> Result<Arc<dyn LogClient>, CtError> {
        let base = normalize_url(&identity.url, &self.default_scheme)
            .map_err(|reason| CtError::config(&identity.description, reason))?;
        Ok(Arc::new(HttpLogClient::new(self.http.clone(), base)))
    }
}

/// CT-over-DNS transport factory sharing one resolver.
#[derive(Clone)]
pub struct DnsClientFactory {
    resolver: Arc<dyn TxtResolver>,
}

impl DnsClientFactory {
    /// Factory resolving through `resolver`.
    pub fn new(resolver: Arc<dyn TxtResolver>) -> Self {
        Self { resolver }
    }
}

impl LogClientFactory for DnsClientFactory {
    fn create(&self, identity: &LogIdentity) -> Result<Arc<dyn LogClient>, CtError> {
        let zone = identity
            .dns_api_endpoint
            .as_deref()
            .ok_or_else(|| CtError::config(&identity.description, "no available DNS endpoint"))?;
        Ok(Arc::new(DnsLogClient::new(self.resolver.clone(), zone)))
    }
}

/// Build the state for a single log-list entry.
pub fn new_log_state(
    entry: &LogListEntry,
    factory: &dyn LogClientFactory,
) -> Result<LogState, CtError> {
    let identity = LogIdentity::from_entry(entry);
    let client = factory.create(&identity)?;
    LogState::new(identity, client)
}

/// Trusted logs indexed by key hash.
#[derive(Debug, Default)]
pub struct LogInfoByHash {
    logs: HashMap<KeyHash, Arc<LogState>>,
}

impl LogInfoByHash {
    /// Build a registry over `entries` with transports from `factory`.
    ///
    /// When two entries share a key, the later one replaces the earlier.
    pub fn from_entries(
        entries: &[LogListEntry],
        factory: &dyn LogClientFactory,
    ) -> Result<Self, CtError> {
        let mut logs = HashMap::with_capacity(entries.len());
        for entry in entries {
            let state = new_log_state(entry, factory)?;
            let key = state.key_hash();
            debug!(
                log = %state.description(),
                endpoint = state.client().endpoint(),
                key_hash = %hex::encode(key),
                "Registered log"
            );
            if let Some(previous) = logs.insert(key, Arc::new(state)) {
                warn!(
                    replaced = %previous.description(),
                    by = %entry.description,
                    "Duplicate log key in log list"
                );
            }
        }
        info!(logs = logs.len(), "Built log registry");
        Ok(Self { logs })
    }

    /// Log with the given key hash.
    pub fn get(&self, key_hash: &KeyHash) -> Option<&Arc<LogState>> {
        self.logs.get(key_hash)
    }

    /// Log that issued `sct`.
    pub fn for_sct(&self, sct: &SignedCertificateTimestamp) -> Option<&Arc<LogState>> {
        self.get(&sct.log_id)
    }

    /// Number of logs.
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    /// True if no logs are registered.
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// All logs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&KeyHash, &Arc<LogState>)> {
        self.logs.iter()
    }
}

/// Registry over `entries` reached through RFC 6962 HTTP.
pub fn log_info_by_key_hash(
    entries: &[LogListEntry],
    factory: &HttpClientFactory,
) -> Result<LogInfoByHash, CtError> {
    LogInfoByHash::from_entries(entries, factory)
}

/// Registry over `entries` reached through their DNS front ends.
///
/// Fails if any entry has no DNS endpoint.
pub fn log_info_by_key_hash_over_dns(
    entries: &[LogListEntry],
    factory: &DnsClientFactory,
) -> Result<LogInfoByHash, CtError> {
    LogInfoByHash::from_entries(entries, factory)
}
