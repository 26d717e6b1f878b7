//! # Log List
//!
//! Serde model of a JSON log list (the format published by browser vendors).
//! Keys are base64 in JSON and raw DER bytes in memory.

use super::errors::CtError;
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

/// Operator of one or more logs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogOperator {
    /// Operator name.
    pub name: String,
    /// Identifier referenced by `LogListEntry::operated_by`.
    pub id: u64,
}

/// One log in a log list.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogListEntry {
    /// Human-readable description.
    pub description: String,
    /// DER-encoded public key.
    #[serde_as(as = "Base64")]
    pub key: Vec<u8>,
    /// Log address, with or without scheme.
    pub url: String,
    /// Maximum merge delay in seconds.
    pub maximum_merge_delay: u64,
    /// Operator ids.
    #[serde(default)]
    pub operated_by: Vec<u64>,
    /// Zone of the log's DNS front end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_api_endpoint: Option<String>,
    /// Disqualification time (seconds since the epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqualified_at: Option<u64>,
}

/// A list of logs and their operators.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogList {
    /// Log operators.
    #[serde(default)]
    pub operators: Vec<LogOperator>,
    /// Logs.
    pub logs: Vec<LogListEntry>,
}

impl LogList {
    /// Parse a JSON log list.
    pub fn from_json(data: &str) -> Result<Self, CtError> {
        serde_json::from_str(data).map_err(|e| CtError::config("<log list>", e.to_string()))
    }

    /// Operator names for a log.
    pub fn operators_of(&self, entry: &LogListEntry) -> Vec<&str> {
        self.operators
            .iter()
            .filter(|op| entry.operated_by.contains(&op.id))
            .map(|op| op.name.as_str())
            .collect()
    }
}
