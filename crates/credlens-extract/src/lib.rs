//! Client for the hosted document-extraction service.
//!
//! Wraps the REST flow behind the vendor SDK: a client-credentials token,
//! an asset upload, an extract job polled until it settles, and a download
//! of the result archive to a caller-supplied path.

mod client;

use thiserror::Error;

pub use client::{DEFAULT_BASE_URL, ExtractClient};

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The service rejected the request or the extraction job failed.
    #[error("service API error: {0}")]
    Api(String),
    /// Quota or billing failure (rate limited / payment required).
    #[error("service usage error: {0}")]
    Usage(String),
    #[error("extraction job did not finish within {0:?}")]
    Timeout(std::time::Duration),
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Element types the service can be asked to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Text,
    Tables,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Tables => "tables",
        }
    }
}
