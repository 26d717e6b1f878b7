//! # Log State
//!
//! Per-log verification state: identity, transport, signature verifier and
//! the last observed signed tree head.
//!
//! ## Concurrency
//!
//! The cached STH sits behind a reader/writer lock owned by this object.
//! Reads (every `verify_inclusion_latest`) vastly outnumber writes (tree head
//! refreshes). The lock is never held across an `.await`, and the cache is
//! only written after a fetch completed and its signature verified, so a
//! cancelled or failed fetch leaves the previous value in place.

use crate::algorithms::codec::leaf_input;
use crate::algorithms::merkle::{leaf_hash, verify_inclusion_proof};
use crate::algorithms::signature::SignatureVerifier;
use crate::context::RequestContext;
use crate::domain::{
    CtError, Hash, KeyHash, LogIdentity, MerkleTreeLeaf, SignatureError,
    SignedCertificateTimestamp, SignedTreeHead,
};
use crate::ports::{LogClient, LogVerificationApi};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Verification state for one trusted log.
pub struct LogState {
    identity: LogIdentity,
    client: Arc<dyn LogClient>,
    verifier: SignatureVerifier,
    last_sth: RwLock<Option<SignedTreeHead>>,
}

impl std::fmt::Debug for LogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogState")
            .field("description", &self.identity.description)
            .field("endpoint", &self.client.endpoint())
            .field("cached_tree_size", &self.last_sth.read().as_ref().map(|s| s.tree_size))
            .finish()
    }
}

impl LogState {
    /// Build the state for `identity`, reached through `client`.
    ///
    /// # Errors
    /// - `LogConfig` if the public key cannot be parsed
    pub fn new(identity: LogIdentity, client: Arc<dyn LogClient>) -> Result<Self, CtError> {
        let verifier = SignatureVerifier::new(&identity.public_key).map_err(|e| {
            CtError::config(
                &identity.description,
                format!("failed to build verifier: {e}"),
            )
        })?;
        Ok(Self {
            identity,
            client,
            verifier,
            last_sth: RwLock::new(None),
        })
    }

    /// Log identity.
    pub fn identity(&self) -> &LogIdentity {
        &self.identity
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.identity.description
    }

    /// Maximum merge delay.
    pub fn mmd(&self) -> Duration {
        self.identity.mmd
    }

    /// DER-encoded public key.
    pub fn public_key(&self) -> &[u8] {
        &self.identity.public_key
    }

    /// SHA-256 of the public key.
    pub fn key_hash(&self) -> KeyHash {
        self.identity.key_hash()
    }

    /// Transport handle.
    pub fn client(&self) -> &Arc<dyn LogClient> {
        &self.client
    }

    /// Signature verifier bound to the log key.
    pub fn verifier(&self) -> &SignatureVerifier {
        &self.verifier
    }

    /// Last known STH, if one has been fetched or set.
    pub fn last_sth(&self) -> Option<SignedTreeHead> {
        self.last_sth.read().clone()
    }

    /// Replace the cached STH unconditionally.
    ///
    /// A smaller tree size than the cached one is accepted but logged.
    pub fn set_sth(&self, sth: SignedTreeHead) {
        let mut slot = self.last_sth.write();
        if let Some(previous) = slot.as_ref() {
            if sth.tree_size < previous.tree_size {
                warn!(
                    log = %self.identity.description,
                    previous = previous.tree_size,
                    fetched = sth.tree_size,
                    "Tree head regressed to a smaller tree size"
                );
            }
        }
        *slot = Some(sth);
    }

    /// Fetch the current STH and check its signature against the pinned key.
    /// Does not touch the cache.
    pub async fn fetch_sth(&self, ctx: &RequestContext) -> Result<SignedTreeHead, CtError> {
        debug!(
            log = %self.identity.description,
            endpoint = self.client.endpoint(),
            "Fetching signed tree head"
        );
        let sth = ctx
            .run(self.client.get_sth())
            .await
            .map_err(|e| CtError::transport(self.description(), "get-sth", e))?;

        self.verifier
            .verify_sth_signature(&sth)
            .map_err(|e| self.signature_error("STH", e))?;
        Ok(sth)
    }

    async fn refresh_sth(&self, ctx: &RequestContext) -> Result<SignedTreeHead, CtError> {
        let sth = self.fetch_sth(ctx).await?;
        self.set_sth(sth.clone());
        Ok(sth)
    }

    fn signature_error(&self, what: &'static str, err: SignatureError) -> CtError {
        match err {
            SignatureError::Encoding(source) => CtError::Encoding {
                log: self.description().to_string(),
                source,
            },
            other => CtError::SignatureInvalid {
                log: self.description().to_string(),
                what,
                reason: other.to_string(),
            },
        }
    }
}

#[async_trait]
impl LogVerificationApi for LogState {
    fn verify_sct_signature(
        &self,
        sct: &SignedCertificateTimestamp,
        leaf: &MerkleTreeLeaf,
    ) -> Result<(), CtError> {
        let leaf = leaf.with_timestamp(sct.timestamp);
        self.verifier
            .verify_sct_signature(sct, &leaf)
            .map_err(|e| self.signature_error("SCT", e))
    }

    async fn verify_inclusion_latest(
        &self,
        ctx: &RequestContext,
        leaf: &MerkleTreeLeaf,
        timestamp: u64,
    ) -> Result<u64, CtError> {
        let sth = match self.last_sth() {
            Some(sth) => {
                debug!(
                    log = %self.identity.description,
                    tree_size = sth.tree_size,
                    "Using cached tree head"
                );
                sth
            }
            None => self.refresh_sth(ctx).await?,
        };
        self.verify_inclusion_at(ctx, leaf, timestamp, sth.tree_size, &sth.sha256_root_hash)
            .await
    }

    async fn verify_inclusion(
        &self,
        ctx: &RequestContext,
        leaf: &MerkleTreeLeaf,
        timestamp: u64,
    ) -> Result<u64, CtError> {
        let sth = self.refresh_sth(ctx).await?;
        self.verify_inclusion_at(ctx, leaf, timestamp, sth.tree_size, &sth.sha256_root_hash)
            .await
    }

    async fn verify_inclusion_at(
        &self,
        ctx: &RequestContext,
        leaf: &MerkleTreeLeaf,
        timestamp: u64,
        tree_size: u64,
        root_hash: &Hash,
    ) -> Result<u64, CtError> {
        let leaf = leaf.with_timestamp(timestamp);
        let input = leaf_input(&leaf).map_err(|source| CtError::Encoding {
            log: self.description().to_string(),
            source,
        })?;
        let hash = leaf_hash(&input);

        let proof = ctx
            .run(self.client.get_proof_by_hash(&hash, tree_size))
            .await
            .map_err(|e| {
                CtError::transport(
                    self.description(),
                    format!("get-proof-by-hash(size={tree_size})"),
                    e,
                )
            })?;

        verify_inclusion_proof(
            proof.leaf_index,
            tree_size,
            &proof.audit_path,
            root_hash,
            &hash,
        )
        .map_err(|source| CtError::ProofInvalid {
            log: self.description().to_string(),
            tree_size,
            source,
        })?;

        debug!(
            log = %self.identity.description,
            tree_size,
            leaf_index = proof.leaf_index,
            "Inclusion verified"
        );
        Ok(proof.leaf_index)
    }
}
