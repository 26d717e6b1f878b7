//! HTTP Log Client Adapter
//!
//! Implements the `LogClient` port over the RFC 6962 §4 JSON API.

use crate::algorithms::codec::decode_digitally_signed;
use crate::domain::{Hash, InclusionProof, SignedTreeHead, TransportError, Version};
use crate::ports::outbound::LogClient;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_with::{base64::Base64, serde_as};
use tracing::debug;

const GET_STH_PATH: &str = "ct/v1/get-sth";
const GET_PROOF_BY_HASH_PATH: &str = "ct/v1/get-proof-by-hash";

/// Longest error body kept in a `TransportError::Status`.
const MAX_ERROR_BODY: usize = 256;

/// Response of `get-sth` (RFC 6962 §4.3).
#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct GetSthResponse {
    tree_size: u64,
    timestamp: u64,
    #[serde_as(as = "Base64")]
    sha256_root_hash: Vec<u8>,
    #[serde_as(as = "Base64")]
    tree_head_signature: Vec<u8>,
}

impl TryFrom<GetSthResponse> for SignedTreeHead {
    type Error = TransportError;

    fn try_from(rsp: GetSthResponse) -> Result<Self, Self::Error> {
        let sha256_root_hash: Hash = rsp.sha256_root_hash.as_slice().try_into().map_err(|_| {
            TransportError::Malformed(format!(
                "root hash is {} bytes, expected 32",
                rsp.sha256_root_hash.len()
            ))
        })?;
        let tree_head_signature = decode_digitally_signed(&rsp.tree_head_signature)
            .map_err(|e| TransportError::Malformed(format!("tree head signature: {e}")))?;
        Ok(SignedTreeHead {
            version: Version::V1,
            tree_size: rsp.tree_size,
            timestamp: rsp.timestamp,
            sha256_root_hash,
            tree_head_signature,
        })
    }
}

/// Response of `get-proof-by-hash` (RFC 6962 §4.5).
#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct GetProofByHashResponse {
    leaf_index: u64,
    #[serde_as(as = "Vec<Base64>")]
    audit_path: Vec<Vec<u8>>,
}

impl TryFrom<GetProofByHashResponse> for InclusionProof {
    type Error = TransportError;

    fn try_from(rsp: GetProofByHashResponse) -> Result<Self, Self::Error> {
        let audit_path = rsp
            .audit_path
            .iter()
            .map(|node| {
                Hash::try_from(node.as_slice()).map_err(|_| {
                    TransportError::Malformed(format!(
                        "audit path node is {} bytes, expected 32",
                        node.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InclusionProof {
            leaf_index: rsp.leaf_index,
            audit_path,
        })
    }
}

/// RFC 6962 HTTP client for one log.
pub struct HttpLogClient {
    http: Client,
    base: Url,
}

impl HttpLogClient {
    /// Client for the log at `base` (e.g. `https://ct.example.com/log`),
    /// sharing the connection pool of `http`.
    pub fn new(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    /// Absolute URL of an API method below the base path.
    pub(crate) fn method_url(&self, path: &str) -> Result<Url, TransportError> {
        let base = self.base.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| TransportError::Http(format!("invalid URL for {path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = self.method_url(path)?;
        debug!(url = %url, "CT HTTP request");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => truncate_body(body),
                Err(e) if e.is_timeout() => return Err(TransportError::DeadlineExceeded),
                Err(_) => String::new(),
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(request_error)?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

fn request_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::DeadlineExceeded
    } else {
        TransportError::Http(e.to_string())
    }
}

/// Cut `body` to at most `MAX_ERROR_BODY` bytes on a character boundary.
fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    body
}

#[async_trait]
impl LogClient for HttpLogClient {
    async fn get_sth(&self) -> Result<SignedTreeHead, TransportError> {
        self.get_json::<GetSthResponse>(GET_STH_PATH, &[])
            .await?
            .try_into()
    }

    async fn get_proof_by_hash(
        &self,
        leaf_hash: &Hash,
        tree_size: u64,
    ) -> Result<InclusionProof, TransportError> {
        let query = [
            ("hash", STANDARD.encode(leaf_hash)),
            ("tree_size", tree_size.to_string()),
        ];
        match self
            .get_json::<GetProofByHashResponse>(GET_PROOF_BY_HASH_PATH, &query)
            .await
        {
            Ok(rsp) => rsp.try_into(),
            Err(TransportError::Status { status: 404, .. }) => {
                Err(TransportError::NotFound { tree_size })
            }
            Err(e) => Err(e),
        }
    }

    fn endpoint(&self) -> &str {
        self.base.as_str()
    }
}
