//! Domain entities loaded from the static blog API.

use std::sync::Arc;

use folio_api_types::{PostPayload, PostSummaryPayload};
use serde::Serialize;
use time::OffsetDateTime;

use super::{error::DomainError, timestamp};

/// Listing metadata for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    /// Category names in source order, without repeats.
    pub categories: Vec<String>,
    pub length: Option<u64>,
    pub excerpt: Option<String>,
}

impl TryFrom<PostSummaryPayload> for PostSummary {
    type Error = DomainError;

    fn try_from(payload: PostSummaryPayload) -> Result<Self, Self::Error> {
        let published_at = timestamp::parse("published", &payload.published)?;
        Ok(Self {
            id: payload.id,
            title: payload.title,
            published_at,
            categories: dedup_preserving_order(payload.categories),
            length: payload.length,
            excerpt: payload.excerpt,
        })
    }
}

/// A full post with its rendered HTML body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Raw HTML as served by the API. Not sanitized.
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub categories: Vec<String>,
    pub draft: bool,
}

impl Post {
    /// Build a post from the payload served for `requested_id`.
    ///
    /// Payloads may omit their own id; the requested one fills the gap.
    pub fn from_payload(requested_id: &str, payload: PostPayload) -> Result<Self, DomainError> {
        let published_at = timestamp::parse("published", &payload.published)?;
        let updated_at = timestamp::parse("updated", &payload.updated)?;
        Ok(Self {
            id: payload.id.unwrap_or_else(|| requested_id.to_string()),
            title: payload.title,
            content: payload.content,
            published_at,
            updated_at,
            categories: payload.categories,
            draft: payload.draft,
        })
    }
}

/// A named group of summaries, derived from the summary list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub posts: Vec<Arc<PostSummary>>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            posts: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
