//! # Domain Entities
//!
//! RFC 6962 log structures consumed by the verifier.

use super::errors::Hash;
use serde::{Deserialize, Serialize};

/// Protocol version (only v1 exists).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Version {
    /// RFC 6962 v1.
    #[default]
    V1,
}

impl Version {
    /// Wire value.
    pub fn as_u8(self) -> u8 {
        match self {
            Version::V1 => 0,
        }
    }
}

/// Kind of entry a log stores.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogEntryType {
    /// Final X.509 certificate.
    X509,
    /// Pre-certificate.
    Precert,
}

impl LogEntryType {
    /// Wire value (2 bytes).
    pub fn as_u16(self) -> u16 {
        match self {
            LogEntryType::X509 => 0,
            LogEntryType::Precert => 1,
        }
    }
}

/// The certificate material covered by a leaf or SCT.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignedEntry {
    /// DER-encoded leaf certificate.
    X509(Vec<u8>),
    /// Pre-certificate TBS with the issuing CA key hash.
    Precert {
        /// SHA-256 of the issuer's SubjectPublicKeyInfo.
        issuer_key_hash: Hash,
        /// DER-encoded TBSCertificate with the poison extension removed.
        tbs_certificate: Vec<u8>,
    },
}

impl SignedEntry {
    /// Entry type tag.
    pub fn entry_type(&self) -> LogEntryType {
        match self {
            SignedEntry::X509(_) => LogEntryType::X509,
            SignedEntry::Precert { .. } => LogEntryType::Precert,
        }
    }
}

/// A log entry together with the log's timestamp.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimestampedEntry {
    /// Milliseconds since the epoch, as assigned by the log.
    pub timestamp: u64,
    /// Certificate material.
    pub entry: SignedEntry,
    /// CT extensions (opaque).
    pub extensions: Vec<u8>,
}

/// Leaf of the log's Merkle tree.
///
/// Only the `timestamped_entry` leaf type exists in v1, so it is not modelled
/// separately.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MerkleTreeLeaf {
    /// Structure version.
    pub version: Version,
    /// The timestamped entry.
    pub timestamped_entry: TimestampedEntry,
}

impl MerkleTreeLeaf {
    /// Leaf for a final certificate.
    pub fn x509(timestamp: u64, cert_der: Vec<u8>) -> Self {
        Self {
            version: Version::V1,
            timestamped_entry: TimestampedEntry {
                timestamp,
                entry: SignedEntry::X509(cert_der),
                extensions: Vec::new(),
            },
        }
    }

    /// Leaf for a pre-certificate.
    pub fn precert(timestamp: u64, issuer_key_hash: Hash, tbs_certificate: Vec<u8>) -> Self {
        Self {
            version: Version::V1,
            timestamped_entry: TimestampedEntry {
                timestamp,
                entry: SignedEntry::Precert {
                    issuer_key_hash,
                    tbs_certificate,
                },
                extensions: Vec::new(),
            },
        }
    }

    /// Copy of this leaf carrying `timestamp` instead of the caller's value.
    ///
    /// Leaf hashes and SCT signatures are defined over the entry as the log
    /// timestamped it.
    pub fn with_timestamp(&self, timestamp: u64) -> Self {
        let mut leaf = self.clone();
        leaf.timestamped_entry.timestamp = timestamp;
        leaf
    }
}

/// Hash algorithm of a `DigitallySigned` structure (RFC 5246 §7.4.1.4.1).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// No hash (used by some Ed25519 encodings).
    None,
    /// SHA-256.
    Sha256,
    /// Signature scheme hashes intrinsically (RFC 8446 Ed25519).
    Intrinsic,
}

impl HashAlgorithm {
    /// Wire value.
    pub fn as_u8(self) -> u8 {
        match self {
            HashAlgorithm::None => 0,
            HashAlgorithm::Sha256 => 4,
            HashAlgorithm::Intrinsic => 8,
        }
    }

    /// Parse a wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(HashAlgorithm::None),
            4 => Some(HashAlgorithm::Sha256),
            8 => Some(HashAlgorithm::Intrinsic),
            _ => None,
        }
    }
}

/// Signature algorithm of a `DigitallySigned` structure.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// ECDSA (P-256 for CT logs).
    Ecdsa,
    /// Ed25519.
    Ed25519,
}

impl SignatureAlgorithm {
    /// Wire value.
    pub fn as_u8(self) -> u8 {
        match self {
            SignatureAlgorithm::Ecdsa => 3,
            SignatureAlgorithm::Ed25519 => 7,
        }
    }

    /// Parse a wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            3 => Some(SignatureAlgorithm::Ecdsa),
            7 => Some(SignatureAlgorithm::Ed25519),
            _ => None,
        }
    }
}

/// A signature with its declared algorithms.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DigitallySigned {
    /// Declared hash algorithm.
    pub hash_algorithm: HashAlgorithm,
    /// Declared signature algorithm.
    pub signature_algorithm: SignatureAlgorithm,
    /// Raw signature bytes (DER for ECDSA, 64 bytes for Ed25519).
    pub signature: Vec<u8>,
}

/// Signed Certificate Timestamp.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedCertificateTimestamp {
    /// SCT version.
    pub version: Version,
    /// SHA-256 of the issuing log's public key.
    pub log_id: Hash,
    /// Milliseconds since the epoch.
    pub timestamp: u64,
    /// CT extensions (opaque).
    pub extensions: Vec<u8>,
    /// Log signature over the entry.
    pub signature: DigitallySigned,
}

/// Signed Tree Head.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedTreeHead {
    /// STH version.
    pub version: Version,
    /// Number of leaves in the tree.
    pub tree_size: u64,
    /// Milliseconds since the epoch.
    pub timestamp: u64,
    /// Merkle tree root.
    pub sha256_root_hash: Hash,
    /// Log signature over the fields above.
    pub tree_head_signature: DigitallySigned,
}

/// Response to a get-proof-by-hash request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InclusionProof {
    /// 0-based position of the leaf.
    pub leaf_index: u64,
    /// Sibling hashes from the leaf up to the root.
    pub audit_path: Vec<Hash>,
}
