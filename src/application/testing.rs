//! In-memory content source for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use folio_api_types::{PostPayload, PostSummaryPayload, WireTimestamp};

use super::repos::{ContentSource, SourceError};

#[derive(Default)]
pub(crate) struct FakeSource {
    summaries: Vec<PostSummaryPayload>,
    posts: HashMap<String, PostPayload>,
    failures_left: AtomicUsize,
    summary_calls: AtomicUsize,
    post_calls: AtomicUsize,
}

impl FakeSource {
    pub(crate) fn with_summaries(summaries: Vec<PostSummaryPayload>) -> Self {
        Self {
            summaries,
            ..Self::default()
        }
    }

    pub(crate) fn with_post(mut self, post: PostPayload) -> Self {
        let id = post.id.clone().unwrap_or_default();
        self.posts.insert(id, post);
        self
    }

    /// Fail the next `count` fetches with a network error.
    pub(crate) fn failing(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub(crate) fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self, url: &str) -> Result<(), SourceError> {
        let consumed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        match consumed {
            Ok(_) => Err(SourceError::network(url, "connection reset")),
            Err(_) => Ok(()),
        }
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn fetch_summaries(&self) -> Result<Vec<PostSummaryPayload>, SourceError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        // Let concurrent callers observe the in-flight load.
        tokio::task::yield_now().await;
        self.take_failure("memory://summary.json")?;
        Ok(self.summaries.clone())
    }

    async fn fetch_post(&self, id: &str) -> Result<PostPayload, SourceError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let url = format!("memory://posts/{id}.json");
        self.take_failure(&url)?;
        self.posts
            .get(id)
            .cloned()
            .ok_or(SourceError::NotFound { url })
    }
}

pub(crate) fn summary(id: &str, published: &str, categories: &[&str]) -> PostSummaryPayload {
    PostSummaryPayload {
        id: id.to_string(),
        title: format!("Title of {id}"),
        published: WireTimestamp::text(published),
        length: None,
        excerpt: None,
        categories: categories.iter().map(|c| (*c).to_string()).collect(),
    }
}

pub(crate) fn post(id: &str, published: &str, content: &str) -> PostPayload {
    PostPayload {
        id: Some(id.to_string()),
        title: format!("Title of {id}"),
        content: content.to_string(),
        published: WireTimestamp::text(published),
        updated: WireTimestamp::text(published),
        draft: false,
        categories: vec!["news".to_string()],
    }
}
