//! # Adapters Module
//!
//! Transport implementations of the `LogClient` port.

pub mod dns;
pub mod http;

pub use dns::DnsLogClient;
pub use http::HttpLogClient;
