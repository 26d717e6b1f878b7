//! DNS Log Client Adapter
//!
//! Implements the `LogClient` port over the CT-over-DNS TXT protocol:
//!
//! - `sth.<zone>` answers `<size>.<timestamp>.<b64 root>.<b64 signature>`
//! - `<base32 leaf hash>.hash.<zone>` answers the decimal leaf index
//! - `<start>.<index>.<size>.tree.<zone>` answers audit path nodes from
//!   position `start`, concatenated as raw 32-byte hashes
//!
//! Record lookup is delegated to a `TxtResolver`.

use crate::algorithms::codec::decode_digitally_signed;
use crate::algorithms::merkle::inclusion_proof_size;
use crate::domain::{Hash, InclusionProof, SignedTreeHead, TransportError, Version};
use crate::ports::outbound::{LogClient, TxtResolver};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use data_encoding::BASE32_NOPAD;
use std::sync::Arc;
use tracing::debug;

/// CT-over-DNS client for one log zone.
pub struct DnsLogClient {
    resolver: Arc<dyn TxtResolver>,
    zone: String,
}

impl DnsLogClient {
    /// Client for the log served under `zone` (e.g. `pilot.ct.googleapis.com`).
    pub fn new(resolver: Arc<dyn TxtResolver>, zone: impl Into<String>) -> Self {
        let zone = zone.into().trim_end_matches('.').to_string();
        Self { resolver, zone }
    }

    /// Look up `name` and require exactly one TXT record.
    async fn single_record(&self, name: &str) -> Result<Vec<u8>, TransportError> {
        debug!(name = %name, "CT DNS query");
        let mut records = self.resolver.lookup_txt(name).await?;
        if records.len() != 1 {
            return Err(TransportError::Malformed(format!(
                "{name}: expected one TXT record, got {}",
                records.len()
            )));
        }
        Ok(records.remove(0))
    }

    async fn leaf_index(&self, leaf_hash: &Hash) -> Result<u64, TransportError> {
        let name = format!("{}.hash.{}", BASE32_NOPAD.encode(leaf_hash), self.zone);
        let record = self.single_record(&name).await?;
        std::str::from_utf8(&record)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .ok_or_else(|| TransportError::Malformed(format!("{name}: leaf index is not a number")))
    }
}

fn parse_sth(record: &[u8]) -> Result<SignedTreeHead, TransportError> {
    let malformed = |what: &str| TransportError::Malformed(format!("sth record: {what}"));

    let text = std::str::from_utf8(record).map_err(|_| malformed("not UTF-8"))?;
    let fields: Vec<&str> = text.trim().split('.').collect();
    let [size, timestamp, root, signature] = fields.as_slice() else {
        return Err(malformed("expected four dot-separated fields"));
    };

    let tree_size = size.parse::<u64>().map_err(|_| malformed("bad tree size"))?;
    let timestamp = timestamp
        .parse::<u64>()
        .map_err(|_| malformed("bad timestamp"))?;
    let sha256_root_hash: Hash = STANDARD
        .decode(root)
        .ok()
        .and_then(|bytes| bytes.as_slice().try_into().ok())
        .ok_or_else(|| malformed("root hash is not 32 base64 bytes"))?;
    let signature = STANDARD
        .decode(signature)
        .map_err(|_| malformed("signature is not base64"))?;
    let tree_head_signature = decode_digitally_signed(&signature)
        .map_err(|e| malformed(&format!("tree head signature: {e}")))?;

    Ok(SignedTreeHead {
        version: Version::V1,
        tree_size,
        timestamp,
        sha256_root_hash,
        tree_head_signature,
    })
}

#[async_trait]
impl LogClient for DnsLogClient {
    async fn get_sth(&self) -> Result<SignedTreeHead, TransportError> {
        let record = self.single_record(&format!("sth.{}", self.zone)).await?;
        parse_sth(&record)
    }

    async fn get_proof_by_hash(
        &self,
        leaf_hash: &Hash,
        tree_size: u64,
    ) -> Result<InclusionProof, TransportError> {
        let leaf_index = self.leaf_index(leaf_hash).await?;
        let expected = inclusion_proof_size(leaf_index, tree_size)
            .ok_or(TransportError::NotFound { tree_size })?;
        let mut audit_path: Vec<Hash> = Vec::with_capacity(expected);
        while audit_path.len() < expected {
            let name = format!(
                "{}.{}.{}.tree.{}",
                audit_path.len(),
                leaf_index,
                tree_size,
                self.zone
            );
            let record = self.single_record(&name).await?;
            if record.is_empty() || record.len() % 32 != 0 {
                return Err(TransportError::Malformed(format!(
                    "{name}: {} bytes is not a whole number of hashes",
                    record.len()
                )));
            }
            for chunk in record.chunks_exact(32) {
                let mut node = [0u8; 32];
                node.copy_from_slice(chunk);
                audit_path.push(node);
            }
        }
        // A server may over-deliver on the last chunk.
        audit_path.truncate(expected);

        Ok(InclusionProof {
            leaf_index,
            audit_path,
        })
    }

    fn endpoint(&self) -> &str {
        &self.zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::codec::{encode_digitally_signed, leaf_input};
    use crate::algorithms::merkle::{audit_path, compute_root, leaf_hash};
    use crate::application::LogState;
    use crate::context::RequestContext;
    use crate::domain::{
        DigitallySigned, ErrorKind, HashAlgorithm, LogIdentity, SignatureAlgorithm,
    };
    use crate::ports::LogVerificationApi;
    use crate::test_support::{leaf_timestamp, sign_sth, test_leaf, Ed25519TestLog, TestSigner};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Default)]
    struct MapResolver {
        records: HashMap<String, Vec<Vec<u8>>>,
        queries: Mutex<Vec<String>>,
    }

    impl MapResolver {
        fn insert(&mut self, name: &str, record: Vec<u8>) {
            self.records.entry(name.to_string()).or_default().push(record);
        }
    }

    #[async_trait]
    impl TxtResolver for MapResolver {
        async fn lookup_txt(&self, name: &str) -> Result<Vec<Vec<u8>>, TransportError> {
            self.queries.lock().push(name.to_string());
            self.records
                .get(name)
                .cloned()
                .ok_or_else(|| TransportError::Dns {
                    name: name.to_string(),
                    reason: "NXDOMAIN".to_string(),
                })
        }
    }

    fn sth_record(size: u64, ts: u64, root: &Hash) -> Vec<u8> {
        let sig = encode_digitally_signed(&DigitallySigned {
            hash_algorithm: HashAlgorithm::Sha256,
            signature_algorithm: SignatureAlgorithm::Ecdsa,
            signature: vec![1, 2, 3],
        })
        .unwrap();
        format!("{size}.{ts}.{}.{}", STANDARD.encode(root), STANDARD.encode(sig)).into_bytes()
    }

    fn hash_name(hash: &Hash, zone: &str) -> String {
        format!("{}.hash.{zone}", BASE32_NOPAD.encode(hash))
    }

    #[test]
    fn test_hash_name_is_unpadded_base32() {
        let name = hash_name(&[0u8; 32], "log.example");
        assert_eq!(name, format!("{}.hash.log.example", "A".repeat(52)));
    }

    #[tokio::test]
    async fn test_get_sth() {
        let mut resolver = MapResolver::default();
        resolver.insert("sth.log.example.com", sth_record(42, 1234, &[7u8; 32]));
        let client = DnsLogClient::new(Arc::new(resolver), "log.example.com.");

        let sth = client.get_sth().await.unwrap();
        assert_eq!(sth.tree_size, 42);
        assert_eq!(sth.timestamp, 1234);
        assert_eq!(sth.sha256_root_hash, [7u8; 32]);
        assert_eq!(sth.tree_head_signature.signature, vec![1, 2, 3]);
        assert_eq!(client.endpoint(), "log.example.com");
    }

    #[tokio::test]
    async fn test_get_sth_rejects_bad_records() {
        let mut resolver = MapResolver::default();
        resolver.insert("sth.a.example", b"42.1234.AAAA".to_vec());
        resolver.insert("sth.b.example", sth_record(1, 1, &[0u8; 32]));
        resolver.insert("sth.b.example", sth_record(2, 2, &[0u8; 32]));
        let resolver = Arc::new(resolver);

        let a = DnsLogClient::new(resolver.clone(), "a.example");
        assert!(matches!(a.get_sth().await, Err(TransportError::Malformed(_))));

        let b = DnsLogClient::new(resolver, "b.example");
        assert!(matches!(b.get_sth().await, Err(TransportError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_get_proof_in_chunks() {
        let leaves: Vec<Hash> = (0u8..10).map(|i| leaf_hash(&[i])).collect();
        let path = audit_path(&leaves, 5).unwrap();
        assert_eq!(path.len(), 4);

        let mut resolver = MapResolver::default();
        resolver.insert(
            &hash_name(&leaves[5], "log.example"),
            b"5".to_vec(),
        );
        resolver.insert("0.5.10.tree.log.example", path[..2].concat());
        resolver.insert("2.5.10.tree.log.example", path[2..].concat());
        let resolver = Arc::new(resolver);

        let client = DnsLogClient::new(resolver.clone(), "log.example");
        let proof = client.get_proof_by_hash(&leaves[5], 10).await.unwrap();

        assert_eq!(proof.leaf_index, 5);
        assert_eq!(proof.audit_path, path);
        assert_eq!(resolver.queries.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_index_beyond_tree_size_not_found() {
        let hash = leaf_hash(b"late");
        let mut resolver = MapResolver::default();
        resolver.insert(&hash_name(&hash, "log.example"), b"12".to_vec());
        let client = DnsLogClient::new(Arc::new(resolver), "log.example");

        assert_eq!(
            client.get_proof_by_hash(&hash, 10).await.unwrap_err(),
            TransportError::NotFound { tree_size: 10 }
        );
    }

    #[tokio::test]
    async fn test_partial_node_is_malformed() {
        let hash = leaf_hash(b"x");
        let mut resolver = MapResolver::default();
        resolver.insert(&hash_name(&hash, "log.example"), b"0".to_vec());
        resolver.insert("0.0.4.tree.log.example", vec![0u8; 40]);
        let client = DnsLogClient::new(Arc::new(resolver), "log.example");

        assert!(matches!(
            client.get_proof_by_hash(&hash, 4).await,
            Err(TransportError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_leaf_is_dns_error() {
        let client = DnsLogClient::new(Arc::new(MapResolver::default()), "log.example");
        assert!(matches!(
            client.get_proof_by_hash(&[0u8; 32], 4).await,
            Err(TransportError::Dns { .. })
        ));
    }

    #[tokio::test]
    async fn test_log_state_verifies_inclusion_over_dns() {
        let signer = Ed25519TestLog::new(5);
        let leaves: Vec<Hash> = (0..10)
            .map(|i| leaf_hash(&leaf_input(&test_leaf(i).with_timestamp(leaf_timestamp(i))).unwrap()))
            .collect();
        let sth = sign_sth(&signer, 10, 99_000, compute_root(&leaves));
        let sig = encode_digitally_signed(&sth.tree_head_signature).unwrap();

        let mut resolver = MapResolver::default();
        resolver.insert(
            "sth.ct.example",
            format!(
                "10.99000.{}.{}",
                STANDARD.encode(sth.sha256_root_hash),
                STANDARD.encode(sig)
            )
            .into_bytes(),
        );
        resolver.insert(&hash_name(&leaves[5], "ct.example"), b"5".to_vec());
        resolver.insert("0.5.10.tree.ct.example", audit_path(&leaves, 5).unwrap().concat());
        // Leaf 3 is served with leaf 5's path.
        resolver.insert(&hash_name(&leaves[3], "ct.example"), b"3".to_vec());
        resolver.insert("0.3.10.tree.ct.example", audit_path(&leaves, 5).unwrap().concat());

        let identity = LogIdentity {
            description: "DNS Log".to_string(),
            url: "ct.example.com".to_string(),
            public_key: signer.public_key_der(),
            mmd: Duration::from_secs(86400),
            dns_api_endpoint: Some("ct.example".to_string()),
        };
        let client = DnsLogClient::new(Arc::new(resolver), "ct.example");
        let state = LogState::new(identity, Arc::new(client)).unwrap();
        let ctx = RequestContext::background();

        let index = state
            .verify_inclusion_latest(&ctx, &test_leaf(5), leaf_timestamp(5))
            .await
            .unwrap();
        assert_eq!(index, 5);
        assert_eq!(state.last_sth().unwrap(), sth);

        let err = state
            .verify_inclusion_latest(&ctx, &test_leaf(3), leaf_timestamp(3))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProofInvalid);
    }
}
