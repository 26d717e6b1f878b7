//! # Domain Value Objects
//!
//! Immutable identity of a trusted log.

use super::errors::Hash;
use super::loglist::LogListEntry;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// SHA-256 of a log's DER-encoded public key (the RFC 6962 log ID).
pub type KeyHash = Hash;

/// Compute the key hash for DER public key bytes.
pub fn key_hash(public_key_der: &[u8]) -> KeyHash {
    Sha256::digest(public_key_der).into()
}

/// Identity of a trusted log, fixed at registry build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogIdentity {
    /// Human-readable description, used in every diagnostic.
    pub description: String,
    /// Log address as listed (not yet normalized).
    pub url: String,
    /// DER-encoded public key.
    pub public_key: Vec<u8>,
    /// Maximum merge delay.
    pub mmd: Duration,
    /// Zone served by the log's DNS front end, if any.
    pub dns_api_endpoint: Option<String>,
}

impl LogIdentity {
    /// Identity described by a log-list entry.
    pub fn from_entry(entry: &LogListEntry) -> Self {
        Self {
            description: entry.description.clone(),
            url: entry.url.clone(),
            public_key: entry.key.clone(),
            mmd: Duration::from_secs(entry.maximum_merge_delay),
            dns_api_endpoint: entry
                .dns_api_endpoint
                .clone()
                .filter(|endpoint| !endpoint.is_empty()),
        }
    }

    /// SHA-256 of the public key.
    pub fn key_hash(&self) -> KeyHash {
        key_hash(&self.public_key)
    }
}
