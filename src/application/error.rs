use serde::Serialize;
use thiserror::Error;

use crate::{
    application::repos::SourceError, domain::error::DomainError, infra::error::InfraError,
};

/// Coarse failure classes surfaced to view consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The fetch did not complete, or the server refused it.
    NetworkFailure,
    /// The response arrived but did not have the expected shape.
    ParseFailure,
    /// The requested post, category or path does not exist.
    NotFound,
    Internal,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Source(SourceError::Network { .. } | SourceError::Status { .. }) => {
                ErrorKind::NetworkFailure
            }
            AppError::Source(SourceError::Decode { .. })
            | AppError::Domain(DomainError::InvalidTimestamp { .. }) => ErrorKind::ParseFailure,
            AppError::Source(SourceError::NotFound { .. })
            | AppError::Domain(DomainError::NotFound { .. }) => ErrorKind::NotFound,
            AppError::Infra(_) | AppError::Unexpected(_) => ErrorKind::Internal,
        }
    }
}

impl From<time::error::Format> for AppError {
    fn from(err: time::error::Format) -> Self {
        Self::unexpected(format!("failed to format date: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_failure_taxonomy() {
        let network = AppError::from(SourceError::Status {
            url: "http://x/summary.json".into(),
            status: 503,
        });
        assert_eq!(network.kind(), ErrorKind::NetworkFailure);

        let decode = AppError::from(SourceError::decode("http://x", "expected array"));
        assert_eq!(decode.kind(), ErrorKind::ParseFailure);

        let timestamp = AppError::from(DomainError::invalid_timestamp("published", "nope"));
        assert_eq!(timestamp.kind(), ErrorKind::ParseFailure);

        let missing = AppError::from(SourceError::NotFound {
            url: "http://x/posts/a.json".into(),
        });
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let config = AppError::from(InfraError::configuration("bad"));
        assert_eq!(config.kind(), ErrorKind::Internal);
    }
}
