//! # Log Signature Verification
//!
//! Verifies SCT and STH signatures against a log's pinned public key.
//!
//! ## Supported keys
//!
//! | Encoding | Algorithm | Declared `DigitallySigned` |
//! |----------|-----------|----------------------------|
//! | SubjectPublicKeyInfo DER | ECDSA P-256 | sha256 / ecdsa |
//! | SubjectPublicKeyInfo DER | Ed25519 | none or intrinsic / ed25519 |
//! | raw 32 bytes | Ed25519 | none or intrinsic / ed25519 |

use crate::algorithms::codec::{sct_signature_input, tree_head_signature_input};
use crate::domain::{
    DigitallySigned, HashAlgorithm, MerkleTreeLeaf, SignatureAlgorithm, SignatureError,
    SignedCertificateTimestamp, SignedTreeHead,
};
use ed25519_dalek::{Signature as Ed25519Signature, VerifyingKey as Ed25519Key};
use p256::ecdsa::{Signature as P256Signature, VerifyingKey as P256Key};

/// A parsed log public key.
#[derive(Clone, Debug)]
pub enum LogPublicKey {
    /// ECDSA over NIST P-256 with SHA-256.
    EcdsaP256(P256Key),
    /// Ed25519.
    Ed25519(Ed25519Key),
}

impl LogPublicKey {
    /// Parse DER SubjectPublicKeyInfo (P-256 or Ed25519) or a raw Ed25519 key.
    pub fn from_der(der: &[u8]) -> Result<Self, SignatureError> {
        if let Ok(key) = <P256Key as p256::pkcs8::DecodePublicKey>::from_public_key_der(der) {
            return Ok(LogPublicKey::EcdsaP256(key));
        }
        if let Ok(key) =
            <Ed25519Key as ed25519_dalek::pkcs8::DecodePublicKey>::from_public_key_der(der)
        {
            return Ok(LogPublicKey::Ed25519(key));
        }
        let raw: [u8; 32] = der.try_into().map_err(|_| SignatureError::UnsupportedKey)?;
        Ed25519Key::from_bytes(&raw)
            .map(LogPublicKey::Ed25519)
            .map_err(|_| SignatureError::UnsupportedKey)
    }

    /// Signature algorithm this key verifies.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            LogPublicKey::EcdsaP256(_) => SignatureAlgorithm::Ecdsa,
            LogPublicKey::Ed25519(_) => SignatureAlgorithm::Ed25519,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LogPublicKey::EcdsaP256(_) => "ECDSA P-256",
            LogPublicKey::Ed25519(_) => "Ed25519",
        }
    }
}

/// Verifier bound to one log's key.
#[derive(Clone, Debug)]
pub struct SignatureVerifier {
    key: LogPublicKey,
}

impl SignatureVerifier {
    /// Build a verifier from DER public key bytes.
    pub fn new(public_key_der: &[u8]) -> Result<Self, SignatureError> {
        Ok(Self {
            key: LogPublicKey::from_der(public_key_der)?,
        })
    }

    /// The pinned key.
    pub fn public_key(&self) -> &LogPublicKey {
        &self.key
    }

    /// Verify `signed` over `data`.
    pub fn verify(&self, data: &[u8], signed: &DigitallySigned) -> Result<(), SignatureError> {
        self.check_algorithms(signed)?;

        match &self.key {
            LogPublicKey::EcdsaP256(key) => {
                let sig = P256Signature::from_der(&signed.signature)
                    .map_err(|e| SignatureError::Malformed(e.to_string()))?;
                p256::ecdsa::signature::Verifier::verify(key, data, &sig)
                    .map_err(|_| SignatureError::Mismatch)
            }
            LogPublicKey::Ed25519(key) => {
                let sig = Ed25519Signature::from_slice(&signed.signature)
                    .map_err(|e| SignatureError::Malformed(e.to_string()))?;
                ed25519_dalek::Verifier::verify(key, data, &sig)
                    .map_err(|_| SignatureError::Mismatch)
            }
        }
    }

    /// Verify an SCT over `leaf`'s certificate material.
    ///
    /// The signed data takes the timestamp and extensions from the SCT.
    pub fn verify_sct_signature(
        &self,
        sct: &SignedCertificateTimestamp,
        leaf: &MerkleTreeLeaf,
    ) -> Result<(), SignatureError> {
        let data = sct_signature_input(sct, leaf)?;
        self.verify(&data, &sct.signature)
    }

    /// Verify a tree head signature.
    pub fn verify_sth_signature(&self, sth: &SignedTreeHead) -> Result<(), SignatureError> {
        let data = tree_head_signature_input(sth);
        self.verify(&data, &sth.tree_head_signature)
    }

    fn check_algorithms(&self, signed: &DigitallySigned) -> Result<(), SignatureError> {
        let ok = match self.key {
            LogPublicKey::EcdsaP256(_) => {
                signed.signature_algorithm == SignatureAlgorithm::Ecdsa
                    && signed.hash_algorithm == HashAlgorithm::Sha256
            }
            LogPublicKey::Ed25519(_) => {
                signed.signature_algorithm == SignatureAlgorithm::Ed25519
                    && matches!(
                        signed.hash_algorithm,
                        HashAlgorithm::None | HashAlgorithm::Intrinsic
                    )
            }
        };
        if ok {
            Ok(())
        } else {
            Err(SignatureError::AlgorithmMismatch {
                key: self.key.name(),
                declared: format!("{:?}/{:?}", signed.hash_algorithm, signed.signature_algorithm),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sign_sct, sign_sth, EcdsaTestLog, Ed25519TestLog, TestSigner};

    fn leaf() -> MerkleTreeLeaf {
        MerkleTreeLeaf::x509(0, b"test certificate".to_vec())
    }

    #[test]
    fn test_parse_p256_spki() {
        let log = EcdsaTestLog::new(7);
        let key = LogPublicKey::from_der(&log.public_key_der()).unwrap();
        assert_eq!(key.algorithm(), SignatureAlgorithm::Ecdsa);
    }

    #[test]
    fn test_parse_ed25519_spki_and_raw() {
        let log = Ed25519TestLog::new(7);
        let spki = LogPublicKey::from_der(&log.public_key_der()).unwrap();
        assert_eq!(spki.algorithm(), SignatureAlgorithm::Ed25519);

        let raw = LogPublicKey::from_der(&log.raw_public_key()).unwrap();
        assert_eq!(raw.algorithm(), SignatureAlgorithm::Ed25519);
    }

    #[test]
    fn test_garbage_key_rejected() {
        assert_eq!(
            LogPublicKey::from_der(&[0x30, 0x03, 0x01, 0x02]).unwrap_err(),
            SignatureError::UnsupportedKey
        );
    }

    #[test]
    fn test_sct_signature_roundtrip_both_algorithms() {
        let signers: Vec<Box<dyn TestSigner>> =
            vec![Box::new(EcdsaTestLog::new(3)), Box::new(Ed25519TestLog::new(3))];
        for signer in signers {
            let verifier = SignatureVerifier::new(&signer.public_key_der()).unwrap();
            let sct = sign_sct(signer.as_ref(), &leaf(), 1_700_000_000_000);
            assert!(verifier.verify_sct_signature(&sct, &leaf()).is_ok());
        }
    }

    #[test]
    fn test_sct_signature_bit_flip_rejected() {
        let log = EcdsaTestLog::new(3);
        let verifier = SignatureVerifier::new(&log.public_key_der()).unwrap();
        let mut sct = sign_sct(&log, &leaf(), 1_700_000_000_000);
        let last = sct.signature.signature.len() - 1;
        sct.signature.signature[last] ^= 0x01;
        assert!(verifier.verify_sct_signature(&sct, &leaf()).is_err());
    }

    #[test]
    fn test_tampered_leaf_rejected() {
        let log = Ed25519TestLog::new(3);
        let verifier = SignatureVerifier::new(&log.public_key_der()).unwrap();
        let sct = sign_sct(&log, &leaf(), 1_700_000_000_000);
        let tampered = MerkleTreeLeaf::x509(0, b"test certificatf".to_vec());
        assert_eq!(
            verifier.verify_sct_signature(&sct, &tampered),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signer = Ed25519TestLog::new(3);
        let other = Ed25519TestLog::new(4);
        let verifier = SignatureVerifier::new(&other.public_key_der()).unwrap();
        let sct = sign_sct(&signer, &leaf(), 5);
        assert!(verifier.verify_sct_signature(&sct, &leaf()).is_err());
    }

    #[test]
    fn test_algorithm_mismatch() {
        let ecdsa = EcdsaTestLog::new(3);
        let ed = Ed25519TestLog::new(3);
        let verifier = SignatureVerifier::new(&ecdsa.public_key_der()).unwrap();
        let sct = sign_sct(&ed, &leaf(), 5);
        assert!(matches!(
            verifier.verify_sct_signature(&sct, &leaf()),
            Err(SignatureError::AlgorithmMismatch { .. })
        ));
    }

    #[test]
    fn test_sth_signature() {
        let log = EcdsaTestLog::new(9);
        let verifier = SignatureVerifier::new(&log.public_key_der()).unwrap();
        let mut sth = sign_sth(&log, 10, 1000, [4u8; 32]);
        assert!(verifier.verify_sth_signature(&sth).is_ok());

        sth.tree_size = 11;
        assert!(verifier.verify_sth_signature(&sth).is_err());
    }
}
