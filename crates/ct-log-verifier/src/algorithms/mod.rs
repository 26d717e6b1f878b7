//! # Algorithms Module
//!
//! TLS encoding of signed log data, Merkle tree arithmetic, and log
//! signature verification.

pub mod codec;
pub mod merkle;
pub mod signature;

pub use codec::{
    decode_digitally_signed, encode_digitally_signed, leaf_input, sct_signature_input,
    tree_head_signature_input,
};
pub use merkle::{
    audit_path, compute_root, inclusion_proof_size, leaf_hash, node_hash, verify_inclusion_proof,
};
pub use signature::{LogPublicKey, SignatureVerifier};
