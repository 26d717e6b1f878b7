//! # Merkle Inclusion Verification
//!
//! RFC 6962 §2.1 hashing and audit path verification.
//!
//! Leaves and interior nodes are domain-separated:
//! - leaf: `SHA-256(0x00 || data)`
//! - node: `SHA-256(0x01 || left || right)`

use crate::domain::{Hash, ProofError};
use sha2::{Digest, Sha256};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Hash a leaf input.
pub fn leaf_hash(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash two child nodes.
pub fn node_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Number of audit path nodes for leaf `index` in a tree of `tree_size`.
///
/// `None` if `index` is not in the tree.
pub fn inclusion_proof_size(index: u64, tree_size: u64) -> Option<usize> {
    if index >= tree_size {
        return None;
    }
    let inner = 64 - (index ^ (tree_size - 1)).leading_zeros();
    let border = index.checked_shr(inner).unwrap_or(0).count_ones();
    Some((inner + border) as usize)
}

/// Verify that `leaf_hash` sits at `index` in the tree of `tree_size` with
/// root `root`.
///
/// # Algorithm (RFC 9162 §2.1.3.2)
///
/// Walk the path with `node = index`, `last = tree_size - 1`: a sibling goes
/// on the left when `node` is odd or `node == last` (right border), otherwise
/// on the right. After the walk `last` must be 0 and the result must equal
/// `root`.
pub fn verify_inclusion_proof(
    index: u64,
    tree_size: u64,
    audit_path: &[Hash],
    root: &Hash,
    leaf_hash: &Hash,
) -> Result<(), ProofError> {
    let expected = inclusion_proof_size(index, tree_size)
        .ok_or(ProofError::IndexOutOfRange { index, tree_size })?;
    if audit_path.len() != expected {
        return Err(ProofError::WrongPathLength {
            got: audit_path.len(),
            expected,
        });
    }

    let mut node = index;
    let mut last = tree_size - 1;
    let mut current = *leaf_hash;

    for sibling in audit_path {
        if node & 1 == 1 || node == last {
            current = node_hash(sibling, &current);
            if node & 1 == 0 {
                while node & 1 == 0 && node != 0 {
                    node >>= 1;
                    last >>= 1;
                }
            }
        } else {
            current = node_hash(&current, sibling);
        }
        node >>= 1;
        last >>= 1;
    }

    if last != 0 || current != *root {
        return Err(ProofError::RootMismatch {
            calculated: hex::encode(current),
            expected: hex::encode(root),
        });
    }
    Ok(())
}

/// Largest power of two strictly less than `n` (n > 1).
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k << 1 < n {
        k <<= 1;
    }
    k
}

/// Merkle tree hash over already-hashed leaves.
///
/// The empty tree hashes to `SHA-256("")`.
pub fn compute_root(leaf_hashes: &[Hash]) -> Hash {
    match leaf_hashes.len() {
        0 => Sha256::digest(b"").into(),
        1 => leaf_hashes[0],
        n => {
            let k = split_point(n);
            node_hash(
                &compute_root(&leaf_hashes[..k]),
                &compute_root(&leaf_hashes[k..]),
            )
        }
    }
}

/// Audit path for leaf `index` over already-hashed leaves.
///
/// Returns `None` if `index` is out of range.
pub fn audit_path(leaf_hashes: &[Hash], index: usize) -> Option<Vec<Hash>> {
    if index >= leaf_hashes.len() {
        return None;
    }
    let mut path = Vec::new();
    collect_path(leaf_hashes, index, &mut path);
    Some(path)
}

fn collect_path(leaves: &[Hash], index: usize, path: &mut Vec<Hash>) {
    let n = leaves.len();
    if n <= 1 {
        return;
    }
    let k = split_point(n);
    if index < k {
        collect_path(&leaves[..k], index, path);
        path.push(compute_root(&leaves[k..]));
    } else {
        collect_path(&leaves[k..], index - k, path);
        path.push(compute_root(&leaves[..k]));
    }
}
