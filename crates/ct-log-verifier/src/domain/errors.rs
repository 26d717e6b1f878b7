//! # Domain Errors
//!
//! Error taxonomy for log verification.
//!
//! Every [`CtError`] carries the description of the log it concerns so that
//! callers can report failures without extra bookkeeping, and exposes an
//! [`ErrorKind`] so trust decisions can branch on the kind programmatically.

use thiserror::Error;

/// Hash type alias (32-byte SHA-256)
pub type Hash = [u8; 32];

/// Coarse classification of a [`CtError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or unusable log-list entry or public key.
    LogConfig,
    /// Network or log-communication failure.
    Transport,
    /// A leaf or entry could not be canonically encoded.
    Encoding,
    /// A cryptographic signature check failed.
    SignatureInvalid,
    /// An inclusion proof did not recompute to the expected root.
    ProofInvalid,
}

/// Log verification error.
#[derive(Debug, Error)]
pub enum CtError {
    /// The log-list entry or its key cannot be turned into a usable log state.
    #[error("log {log:?}: invalid configuration: {reason}")]
    LogConfig {
        /// Log description
        log: String,
        /// What was wrong
        reason: String,
    },

    /// The transport failed while performing `operation`.
    #[error("log {log:?}: {operation} failed: {source}")]
    Transport {
        /// Log description
        log: String,
        /// Operation being performed (e.g. `get-sth`)
        operation: String,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// Canonical encoding failed.
    #[error("log {log:?}: encoding failed: {source}")]
    Encoding {
        /// Log description
        log: String,
        /// Underlying codec failure
        #[source]
        source: CodecError,
    },

    /// Signature verification failed.
    #[error("log {log:?}: invalid {what} signature: {reason}")]
    SignatureInvalid {
        /// Log description
        log: String,
        /// Signed object (`SCT` or `STH`)
        what: &'static str,
        /// Verifier diagnostic
        reason: String,
    },

    /// Inclusion proof verification failed.
    #[error("log {log:?}: inclusion proof invalid at size {tree_size}: {source}")]
    ProofInvalid {
        /// Log description
        log: String,
        /// Tree size the proof was checked against
        tree_size: u64,
        /// Merkle verifier diagnostic
        #[source]
        source: ProofError,
    },
}

impl CtError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CtError::LogConfig { .. } => ErrorKind::LogConfig,
            CtError::Transport { .. } => ErrorKind::Transport,
            CtError::Encoding { .. } => ErrorKind::Encoding,
            CtError::SignatureInvalid { .. } => ErrorKind::SignatureInvalid,
            CtError::ProofInvalid { .. } => ErrorKind::ProofInvalid,
        }
    }

    /// Description of the log this error concerns.
    pub fn log_description(&self) -> &str {
        match self {
            CtError::LogConfig { log, .. }
            | CtError::Transport { log, .. }
            | CtError::Encoding { log, .. }
            | CtError::SignatureInvalid { log, .. }
            | CtError::ProofInvalid { log, .. } => log,
        }
    }

    /// True when the error indicates log misbehaviour rather than an
    /// operational failure.
    pub fn is_log_misbehavior(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::SignatureInvalid | ErrorKind::ProofInvalid
        )
    }

    pub(crate) fn config(log: &str, reason: impl Into<String>) -> Self {
        CtError::LogConfig {
            log: log.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn transport(log: &str, operation: impl Into<String>, source: TransportError) -> Self {
        CtError::Transport {
            log: log.to_string(),
            operation: operation.into(),
            source,
        }
    }
}

/// Transport-level failure reported by a [`LogClient`](crate::ports::LogClient).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The log answered with a non-success status.
    #[error("log returned HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// DNS lookup failed.
    #[error("DNS lookup for {name} failed: {reason}")]
    Dns {
        /// Queried name
        name: String,
        /// Resolver diagnostic
        reason: String,
    },

    /// The log's response could not be parsed.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The log does not know the requested leaf at the requested size.
    #[error("leaf not found at tree size {tree_size}")]
    NotFound {
        /// Tree size queried
        tree_size: u64,
    },

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The caller's deadline passed before the request completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// TLS encoding / decoding failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A length does not fit into its length prefix.
    #[error("{field} too long: {len} bytes (max {max})")]
    TooLong {
        /// Field being encoded
        field: &'static str,
        /// Actual length
        len: usize,
        /// Maximum encodable length
        max: usize,
    },

    /// Input ended before the structure was complete.
    #[error("truncated input: need {need} bytes, have {have}")]
    Truncated {
        /// Bytes required
        need: usize,
        /// Bytes available
        have: usize,
    },

    /// Bytes left over after decoding.
    #[error("{0} trailing bytes")]
    TrailingData(usize),

    /// Unknown enum value.
    #[error("unknown {field} value {value}")]
    UnknownValue {
        /// Field being decoded
        field: &'static str,
        /// Value seen
        value: u16,
    },
}

/// Signature verifier failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The key is not P-256 or Ed25519 in a supported encoding.
    #[error("unsupported or malformed public key")]
    UnsupportedKey,

    /// The signature's declared algorithms do not match the log key.
    #[error("algorithm mismatch: key is {key}, signature declares {declared}")]
    AlgorithmMismatch {
        /// Key algorithm
        key: &'static str,
        /// Declared hash/signature algorithm pair
        declared: String,
    },

    /// The signature bytes cannot be parsed.
    #[error("malformed signature: {0}")]
    Malformed(String),

    /// The signature does not verify.
    #[error("signature does not verify")]
    Mismatch,

    /// The signed structure could not be encoded.
    #[error(transparent)]
    Encoding(#[from] CodecError),
}

/// Merkle inclusion proof verification failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProofError {
    /// Leaf index is outside the tree.
    #[error("leaf index {index} out of range for tree size {tree_size}")]
    IndexOutOfRange {
        /// Claimed leaf index
        index: u64,
        /// Tree size
        tree_size: u64,
    },

    /// Audit path has the wrong number of nodes.
    #[error("audit path has {got} nodes, expected {expected}")]
    WrongPathLength {
        /// Nodes supplied
        got: usize,
        /// Nodes required for (index, size)
        expected: usize,
    },

    /// Recomputed root differs from the expected root.
    #[error("root mismatch: calculated {calculated}, expected {expected}")]
    RootMismatch {
        /// Hex of the recomputed root
        calculated: String,
        /// Hex of the expected root
        expected: String,
    },
}
