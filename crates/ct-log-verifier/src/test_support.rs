//! Test fixtures: signing logs, signed structures and a populated mock log.

use crate::algorithms::codec::{leaf_input, sct_signature_input, tree_head_signature_input};
use crate::algorithms::merkle::{compute_root, leaf_hash};
use crate::application::LogState;
use crate::domain::{
    key_hash, DigitallySigned, Hash, HashAlgorithm, LogIdentity, MerkleTreeLeaf,
    SignatureAlgorithm, SignedCertificateTimestamp, SignedTreeHead, Version,
};
use crate::ports::MockLogClient;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const TIMESTAMP_BASE: u64 = 1_700_000_000_000;

pub(crate) trait TestSigner {
    fn public_key_der(&self) -> Vec<u8>;
    fn sign(&self, data: &[u8]) -> DigitallySigned;
}

pub(crate) struct EcdsaTestLog {
    key: p256::ecdsa::SigningKey,
}

impl EcdsaTestLog {
    pub(crate) fn new(seed: u8) -> Self {
        Self {
            key: p256::ecdsa::SigningKey::from_slice(&[seed; 32]).unwrap(),
        }
    }
}

impl TestSigner for EcdsaTestLog {
    fn public_key_der(&self) -> Vec<u8> {
        p256::pkcs8::EncodePublicKey::to_public_key_der(self.key.verifying_key())
            .unwrap()
            .as_bytes()
            .to_vec()
    }

    fn sign(&self, data: &[u8]) -> DigitallySigned {
        let sig: p256::ecdsa::Signature =
            p256::ecdsa::signature::Signer::sign(&self.key, data);
        DigitallySigned {
            hash_algorithm: HashAlgorithm::Sha256,
            signature_algorithm: SignatureAlgorithm::Ecdsa,
            signature: sig.to_der().as_bytes().to_vec(),
        }
    }
}

pub(crate) struct Ed25519TestLog {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519TestLog {
    pub(crate) fn new(seed: u8) -> Self {
        Self {
            key: ed25519_dalek::SigningKey::from_bytes(&[seed; 32]),
        }
    }

    pub(crate) fn raw_public_key(&self) -> Vec<u8> {
        self.key.verifying_key().to_bytes().to_vec()
    }
}

impl TestSigner for Ed25519TestLog {
    fn public_key_der(&self) -> Vec<u8> {
        ed25519_dalek::pkcs8::EncodePublicKey::to_public_key_der(&self.key.verifying_key())
            .unwrap()
            .as_bytes()
            .to_vec()
    }

    fn sign(&self, data: &[u8]) -> DigitallySigned {
        DigitallySigned {
            hash_algorithm: HashAlgorithm::Intrinsic,
            signature_algorithm: SignatureAlgorithm::Ed25519,
            signature: ed25519_dalek::Signer::sign(&self.key, data)
                .to_bytes()
                .to_vec(),
        }
    }
}

pub(crate) fn sign_sct(
    signer: &dyn TestSigner,
    leaf: &MerkleTreeLeaf,
    timestamp: u64,
) -> SignedCertificateTimestamp {
    let mut sct = SignedCertificateTimestamp {
        version: Version::V1,
        log_id: key_hash(&signer.public_key_der()),
        timestamp,
        extensions: Vec::new(),
        signature: signer.sign(&[]),
    };
    let data = sct_signature_input(&sct, leaf).unwrap();
    sct.signature = signer.sign(&data);
    sct
}

pub(crate) fn sign_sth(
    signer: &dyn TestSigner,
    tree_size: u64,
    timestamp: u64,
    root: Hash,
) -> SignedTreeHead {
    let mut sth = SignedTreeHead {
        version: Version::V1,
        tree_size,
        timestamp,
        sha256_root_hash: root,
        tree_head_signature: signer.sign(&[]),
    };
    sth.tree_head_signature = signer.sign(&tree_head_signature_input(&sth));
    sth
}

pub(crate) fn test_leaf(i: u64) -> MerkleTreeLeaf {
    MerkleTreeLeaf::x509(0, format!("certificate #{i}").into_bytes())
}

pub(crate) fn leaf_timestamp(i: u64) -> u64 {
    TIMESTAMP_BASE + i
}

/// Ed25519 log with `n` leaves, a mock transport and its `LogState`.
pub(crate) struct TestLogEnv {
    pub(crate) signer: Ed25519TestLog,
    pub(crate) client: Arc<MockLogClient>,
    pub(crate) hashes: Vec<Hash>,
    pub(crate) state: LogState,
}

impl TestLogEnv {
    pub(crate) fn new(n: u64) -> Self {
        let signer = Ed25519TestLog::new(1);
        let hashes: Vec<Hash> = (0..n)
            .map(|i| {
                let leaf = test_leaf(i).with_timestamp(leaf_timestamp(i));
                leaf_hash(&leaf_input(&leaf).unwrap())
            })
            .collect();

        let client = Arc::new(MockLogClient::new("mock://test-log"));
        client.set_leaves(hashes.clone());

        let identity = LogIdentity {
            description: "Test Log".to_string(),
            url: "log.example.com/ct".to_string(),
            public_key: signer.public_key_der(),
            mmd: Duration::from_secs(86400),
            dns_api_endpoint: None,
        };
        let state = LogState::new(identity, client.clone()).unwrap();

        let env = Self {
            signer,
            client,
            hashes,
            state,
        };
        env.publish(n);
        env
    }

    /// Signed tree head over the first `size` leaves.
    pub(crate) fn sth_at(&self, size: u64) -> SignedTreeHead {
        let root = compute_root(&self.hashes[..size as usize]);
        sign_sth(&self.signer, size, TIMESTAMP_BASE + 10_000 + size, root)
    }

    /// Make the mock serve the tree head at `size`.
    pub(crate) fn publish(&self, size: u64) {
        self.client.set_sth(self.sth_at(size));
    }
}
