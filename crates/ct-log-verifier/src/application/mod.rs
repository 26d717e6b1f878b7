//! # Application Module
//!
//! Per-log verification state and the key-hash registry built from a log list.

pub mod log_state;
pub mod registry;

pub use log_state::LogState;
pub use registry::{
    log_info_by_key_hash, log_info_by_key_hash_over_dns, DnsClientFactory, HttpClientFactory,
    LogClientFactory, LogInfoByHash,
};
