use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("domain entity `{entity}` with key `{key}` not found")]
    NotFound { entity: &'static str, key: String },
    #[error("field `{field}` holds an invalid timestamp `{value}`")]
    InvalidTimestamp { field: &'static str, value: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn invalid_timestamp(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidTimestamp {
            field,
            value: value.to_string(),
        }
    }
}
