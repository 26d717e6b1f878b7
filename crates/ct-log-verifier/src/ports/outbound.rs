//! # Outbound Ports
//!
//! Traits for the transports a log is reached through.

use crate::algorithms::merkle::audit_path;
use crate::domain::{Hash, InclusionProof, SignedTreeHead, TransportError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Client for one log - outbound port.
///
/// HTTP and DNS implementations are interchangeable; verification logic is
/// written once against this trait.
#[async_trait]
pub trait LogClient: Send + Sync {
    /// Fetch the log's current signed tree head.
    ///
    /// The signature is not checked here; callers verify it against the
    /// pinned key.
    async fn get_sth(&self) -> Result<SignedTreeHead, TransportError>;

    /// Fetch the inclusion proof for `leaf_hash` in the tree of `tree_size`.
    async fn get_proof_by_hash(
        &self,
        leaf_hash: &Hash,
        tree_size: u64,
    ) -> Result<InclusionProof, TransportError>;

    /// Endpoint identifier (for logging/debugging).
    fn endpoint(&self) -> &str;
}

/// TXT record lookup - outbound port used by the DNS transport.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Look up TXT records for `name`. Each record is returned as the
    /// concatenation of its character-strings.
    async fn lookup_txt(&self, name: &str) -> Result<Vec<Vec<u8>>, TransportError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory log for testing.
///
/// Serves a fixed STH and answers proof requests from a list of leaf hashes.
/// Call counters let tests assert how often the transport was hit.
#[derive(Default)]
pub struct MockLogClient {
    endpoint: String,
    sth: RwLock<Option<SignedTreeHead>>,
    leaves: RwLock<Vec<Hash>>,
    proof_size_override: RwLock<Option<u64>>,
    delay: RwLock<Option<Duration>>,
    should_fail: AtomicBool,
    sth_calls: AtomicUsize,
    proof_calls: AtomicUsize,
}

impl MockLogClient {
    /// Empty mock log.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Replace the served STH.
    pub fn set_sth(&self, sth: SignedTreeHead) {
        *self.sth.write() = Some(sth);
    }

    /// Replace the leaf hashes proofs are computed over.
    pub fn set_leaves(&self, leaves: Vec<Hash>) {
        *self.leaves.write() = leaves;
    }

    /// Compute audit paths over this many leaves instead of the requested
    /// tree size.
    pub fn set_proof_size_override(&self, size: Option<u64>) {
        *self.proof_size_override.write() = size;
    }

    /// Sleep this long before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    /// Make every call fail with an HTTP error.
    pub fn set_failing(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `get_sth` calls so far.
    pub fn sth_calls(&self) -> usize {
        self.sth_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_proof_by_hash` calls so far.
    pub fn proof_calls(&self) -> usize {
        self.proof_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) -> Result<(), TransportError> {
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(TransportError::Http("Mock failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LogClient for MockLogClient {
    async fn get_sth(&self) -> Result<SignedTreeHead, TransportError> {
        self.sth_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await?;

        self.sth
            .read()
            .clone()
            .ok_or_else(|| TransportError::Malformed("no STH published".to_string()))
    }

    async fn get_proof_by_hash(
        &self,
        leaf_hash: &Hash,
        tree_size: u64,
    ) -> Result<InclusionProof, TransportError> {
        self.proof_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await?;

        let leaves = self.leaves.read();
        let size = self.proof_size_override.read().unwrap_or(tree_size) as usize;
        let not_found = TransportError::NotFound { tree_size };

        if tree_size as usize > leaves.len() || size > leaves.len() {
            return Err(not_found);
        }
        let index = leaves[..tree_size as usize]
            .iter()
            .position(|h| h == leaf_hash)
            .ok_or_else(|| not_found.clone())?;
        let path = audit_path(&leaves[..size], index).ok_or(not_found)?;

        Ok(InclusionProof {
            leaf_index: index as u64,
            audit_path: path,
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
