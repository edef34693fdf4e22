//! The seam between the blog services and wherever the JSON comes from.

use async_trait::async_trait;
use folio_api_types::{PostPayload, PostSummaryPayload};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to `{url}` failed: {message}")]
    Network { url: String, message: String },
    #[error("`{url}` responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("`{url}` does not exist")]
    NotFound { url: String },
    #[error("failed to decode response from `{url}`: {message}")]
    Decode { url: String, message: String },
}

impl SourceError {
    pub fn network(url: impl ToString, err: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(url: impl ToString, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Fetches wire payloads. Implementations do not cache.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// The full summary list, in source order.
    async fn fetch_summaries(&self) -> Result<Vec<PostSummaryPayload>, SourceError>;

    /// One post by id.
    async fn fetch_post(&self, id: &str) -> Result<PostPayload, SourceError>;
}
