//! # Inbound Ports
//!
//! API trait defining what a log's verification state can do.

use crate::context::RequestContext;
use crate::domain::{CtError, Hash, MerkleTreeLeaf, SignedCertificateTimestamp};
use async_trait::async_trait;

/// Log verification API - inbound port.
///
/// All operations are safe to call concurrently against the same log. The
/// caller's leaf is never modified: timestamp adjustments are made on a copy.
#[async_trait]
pub trait LogVerificationApi: Send + Sync {
    /// Check the SCT signature over `leaf`, with the leaf timestamp taken
    /// from the SCT.
    fn verify_sct_signature(
        &self,
        sct: &SignedCertificateTimestamp,
        leaf: &MerkleTreeLeaf,
    ) -> Result<(), CtError>;

    /// Check inclusion at the cached tree head, fetching one only if none is
    /// cached yet. Returns the leaf index.
    async fn verify_inclusion_latest(
        &self,
        ctx: &RequestContext,
        leaf: &MerkleTreeLeaf,
        timestamp: u64,
    ) -> Result<u64, CtError>;

    /// Check inclusion at a freshly fetched tree head. Returns the leaf index.
    async fn verify_inclusion(
        &self,
        ctx: &RequestContext,
        leaf: &MerkleTreeLeaf,
        timestamp: u64,
    ) -> Result<u64, CtError>;

    /// Check inclusion in the tree of `tree_size` with root `root_hash`.
    /// Returns the leaf index.
    async fn verify_inclusion_at(
        &self,
        ctx: &RequestContext,
        leaf: &MerkleTreeLeaf,
        timestamp: u64,
        tree_size: u64,
        root_hash: &Hash,
    ) -> Result<u64, CtError>;
}
