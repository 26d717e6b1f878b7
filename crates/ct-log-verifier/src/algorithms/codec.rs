//! # TLS Codec
//!
//! Canonical RFC 6962 encodings of the structures the log hashes and signs.
//!
//! All integers are big-endian; variable-length fields carry a 2- or 3-byte
//! length prefix.

use crate::domain::{
    CodecError, DigitallySigned, HashAlgorithm, MerkleTreeLeaf, SignatureAlgorithm,
    SignedCertificateTimestamp, SignedEntry, SignedTreeHead, TimestampedEntry,
};

const MAX_U16: usize = 0xFFFF;
const MAX_U24: usize = 0xFF_FFFF;

/// `LeafType.timestamped_entry`
const LEAF_TYPE_TIMESTAMPED_ENTRY: u8 = 0;
/// `SignatureType.certificate_timestamp`
const SIGNATURE_TYPE_CERTIFICATE_TIMESTAMP: u8 = 0;
/// `SignatureType.tree_hash`
const SIGNATURE_TYPE_TREE_HASH: u8 = 1;

fn write_length_prefixed(
    buf: &mut Vec<u8>,
    data: &[u8],
    prefix_len: usize,
    field: &'static str,
) -> Result<(), CodecError> {
    let max = if prefix_len == 2 { MAX_U16 } else { MAX_U24 };
    if data.len() > max {
        return Err(CodecError::TooLong {
            field,
            len: data.len(),
            max,
        });
    }
    let len = (data.len() as u32).to_be_bytes();
    buf.extend_from_slice(&len[4 - prefix_len..]);
    buf.extend_from_slice(data);
    Ok(())
}

fn write_signed_entry(buf: &mut Vec<u8>, entry: &SignedEntry) -> Result<(), CodecError> {
    buf.extend_from_slice(&entry.entry_type().as_u16().to_be_bytes());
    match entry {
        SignedEntry::X509(cert) => write_length_prefixed(buf, cert, 3, "certificate"),
        SignedEntry::Precert {
            issuer_key_hash,
            tbs_certificate,
        } => {
            buf.extend_from_slice(issuer_key_hash);
            write_length_prefixed(buf, tbs_certificate, 3, "tbs_certificate")
        }
    }
}

fn write_timestamped_entry(buf: &mut Vec<u8>, entry: &TimestampedEntry) -> Result<(), CodecError> {
    buf.extend_from_slice(&entry.timestamp.to_be_bytes());
    write_signed_entry(buf, &entry.entry)?;
    write_length_prefixed(buf, &entry.extensions, 2, "extensions")
}

/// Encode a `MerkleTreeLeaf` (the input to the leaf hash).
pub fn leaf_input(leaf: &MerkleTreeLeaf) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(64);
    buf.push(leaf.version.as_u8());
    buf.push(LEAF_TYPE_TIMESTAMPED_ENTRY);
    write_timestamped_entry(&mut buf, &leaf.timestamped_entry)?;
    Ok(buf)
}

/// Encode the data an SCT signature covers.
///
/// The timestamp and extensions come from the SCT, the certificate material
/// from the leaf.
pub fn sct_signature_input(
    sct: &SignedCertificateTimestamp,
    leaf: &MerkleTreeLeaf,
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(64);
    buf.push(sct.version.as_u8());
    buf.push(SIGNATURE_TYPE_CERTIFICATE_TIMESTAMP);
    buf.extend_from_slice(&sct.timestamp.to_be_bytes());
    write_signed_entry(&mut buf, &leaf.timestamped_entry.entry)?;
    write_length_prefixed(&mut buf, &sct.extensions, 2, "extensions")?;
    Ok(buf)
}

/// Encode the data a tree head signature covers.
pub fn tree_head_signature_input(sth: &SignedTreeHead) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + 8 + 8 + 32);
    buf.push(sth.version.as_u8());
    buf.push(SIGNATURE_TYPE_TREE_HASH);
    buf.extend_from_slice(&sth.timestamp.to_be_bytes());
    buf.extend_from_slice(&sth.tree_size.to_be_bytes());
    buf.extend_from_slice(&sth.sha256_root_hash);
    buf
}

/// Encode a `DigitallySigned` structure.
pub fn encode_digitally_signed(ds: &DigitallySigned) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(4 + ds.signature.len());
    buf.push(ds.hash_algorithm.as_u8());
    buf.push(ds.signature_algorithm.as_u8());
    write_length_prefixed(&mut buf, &ds.signature, 2, "signature")?;
    Ok(buf)
}

/// Decode a `DigitallySigned` structure, rejecting trailing bytes.
pub fn decode_digitally_signed(data: &[u8]) -> Result<DigitallySigned, CodecError> {
    if data.len() < 4 {
        return Err(CodecError::Truncated {
            need: 4,
            have: data.len(),
        });
    }
    let hash_algorithm =
        HashAlgorithm::from_u8(data[0]).ok_or(CodecError::UnknownValue {
            field: "hash_algorithm",
            value: data[0] as u16,
        })?;
    let signature_algorithm =
        SignatureAlgorithm::from_u8(data[1]).ok_or(CodecError::UnknownValue {
            field: "signature_algorithm",
            value: data[1] as u16,
        })?;
    let len = u16::from_be_bytes([data[2], data[3]]) as usize;
    let body = &data[4..];
    if body.len() < len {
        return Err(CodecError::Truncated {
            need: 4 + len,
            have: data.len(),
        });
    }
    if body.len() > len {
        return Err(CodecError::TrailingData(body.len() - len));
    }
    Ok(DigitallySigned {
        hash_algorithm,
        signature_algorithm,
        signature: body.to_vec(),
    })
}
