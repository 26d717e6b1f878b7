//! # CT Log Verifier
//!
//! Client-side verification against Certificate Transparency logs
//! (RFC 6962).
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Given a list of trusted logs, check that a log really signed an SCT and
//! that a certificate was actually incorporated into the log's Merkle tree:
//! - SCT signatures over the canonical TLS encoding of the entry
//! - Tree head signatures against the pinned log key
//! - Inclusion proofs against a fetched, cached or caller-supplied tree head
//!
//! ## Security Properties
//!
//! | Check | Failure |
//! |-------|---------|
//! | SCT signed by the pinned key | `SignatureInvalid` |
//! | STH signed by the pinned key before use or caching | `SignatureInvalid` |
//! | Audit path recomputes the tree root | `ProofInvalid` |
//! | Proof length matches index and tree size | `ProofInvalid` |
//!
//! ## Module Structure
//!
//! ```text
//! ct-log-verifier/
//! ├── domain/          # Log structures, LogIdentity, log list, errors
//! ├── algorithms/      # TLS codec, Merkle arithmetic, signature verifier
//! ├── ports/           # LogVerificationApi (inbound) + LogClient, TxtResolver (outbound)
//! ├── adapters/        # HTTP (RFC 6962 JSON) and DNS (TXT) log clients
//! ├── application/     # LogState and the key-hash registry
//! ├── context.rs       # RequestContext: deadline + cancellation
//! └── config.rs        # VerifierConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod context;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod test_support;

// Re-exports
pub use adapters::{DnsLogClient, HttpLogClient};
pub use algorithms::{
    compute_root, inclusion_proof_size, leaf_hash, leaf_input, sct_signature_input,
    tree_head_signature_input, verify_inclusion_proof, LogPublicKey, SignatureVerifier,
};
pub use application::{
    log_info_by_key_hash, log_info_by_key_hash_over_dns, DnsClientFactory, HttpClientFactory,
    LogClientFactory, LogInfoByHash, LogState,
};
pub use config::VerifierConfig;
pub use context::{CancelHandle, CancelToken, RequestContext};
pub use domain::{
    key_hash, CtError, DigitallySigned, ErrorKind, Hash, HashAlgorithm, InclusionProof,
    KeyHash, LogEntryType, LogIdentity, LogList, LogListEntry, LogOperator, MerkleTreeLeaf,
    SignatureAlgorithm, SignedCertificateTimestamp, SignedEntry, SignedTreeHead,
    TimestampedEntry, TransportError, Version,
};
pub use ports::{LogClient, LogVerificationApi, MockLogClient, TxtResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
