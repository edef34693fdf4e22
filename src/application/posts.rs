use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{error::AppError, repos::ContentSource};
use crate::cache::{KeyedCells, LoadStatus};
use crate::domain::entities::Post;

const SOURCE: &str = "application::posts";

/// Fetches posts by id and keeps every loaded post for the process lifetime.
pub struct PostStore {
    source: Arc<dyn ContentSource>,
    posts: KeyedCells<String, Arc<Post>>,
}

impl PostStore {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            posts: KeyedCells::new(),
        }
    }

    /// Return the post stored under `id`, fetching it on first request.
    ///
    /// Repeated calls return the same `Arc`. Concurrent first requests for one
    /// id share a single fetch. A failed fetch is not cached.
    pub async fn get_post(&self, id: &str) -> Result<Arc<Post>, AppError> {
        let cell = self.posts.cell(id);
        if let Some(post) = cell.get() {
            debug!(target_module = SOURCE, post_id = id, result = "hit", "post cache");
            return Ok(Arc::clone(post));
        }

        let source = &self.source;
        let post = cell
            .get_or_try_load(|| async move {
                debug!(target_module = SOURCE, post_id = id, result = "miss", "post cache");
                let payload = source.fetch_post(id).await?;
                let post = Post::from_payload(id, payload)?;
                Ok::<_, AppError>(Arc::new(post))
            })
            .await
            .inspect_err(|err| {
                warn!(target_module = SOURCE, post_id = id, error = %err, "failed to load post");
                self.posts.forget_unloaded(id);
            })?;

        Ok(Arc::clone(post))
    }

    pub fn status(&self, id: &str) -> LoadStatus {
        self.posts.status(id)
    }

    pub fn is_cached(&self, id: &str) -> bool {
        self.status(id) == LoadStatus::Loaded
    }

    pub fn cached_len(&self) -> usize {
        self.posts.loaded_len()
    }
}
