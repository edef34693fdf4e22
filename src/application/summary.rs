//! Summary list and the category index derived from it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{error::AppError, repos::ContentSource};
use crate::cache::{LoadCell, LoadStatus};
use crate::domain::entities::{Category, PostSummary};

const SOURCE: &str = "application::summary";

/// Category name to summaries, in the order names were first seen.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    categories: Vec<Category>,
    positions: HashMap<String, usize>,
}

impl CategoryIndex {
    /// Build a fresh index. Posts keep their source order within a category.
    pub fn rebuild(posts: &[Arc<PostSummary>]) -> Self {
        let mut index = Self::default();
        for post in posts {
            for name in &post.categories {
                let position = match index.positions.get(name) {
                    Some(position) => *position,
                    None => {
                        index.categories.push(Category::new(name.clone()));
                        let position = index.categories.len() - 1;
                        index.positions.insert(name.clone(), position);
                        position
                    }
                };
                index.categories[position].posts.push(Arc::clone(post));
            }
        }
        index
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.positions
            .get(name)
            .map(|position| &self.categories[*position])
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The loaded summary list together with its index.
#[derive(Debug)]
struct SummarySnapshot {
    posts: Arc<[Arc<PostSummary>]>,
    index: CategoryIndex,
}

/// Loads the summary list once and answers listing and category queries.
pub struct SummaryIndex {
    source: Arc<dyn ContentSource>,
    snapshot: LoadCell<SummarySnapshot>,
}

impl SummaryIndex {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            snapshot: LoadCell::new(),
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.snapshot.status()
    }

    /// All summaries in source order.
    ///
    /// The first call fetches; later calls, including after an empty list was
    /// loaded, are served from memory.
    pub async fn get_summaries(&self) -> Result<Arc<[Arc<PostSummary>]>, AppError> {
        Ok(Arc::clone(&self.snapshot().await?.posts))
    }

    /// The category called `name`, or `None` when no post carries it.
    pub async fn get_category(&self, name: &str) -> Result<Option<Category>, AppError> {
        Ok(self.snapshot().await?.index.get(name).cloned())
    }

    /// Every category, in the order names first appear in the summary list.
    pub async fn get_category_names(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.snapshot().await?.index.categories().to_vec())
    }

    async fn snapshot(&self) -> Result<&SummarySnapshot, AppError> {
        if let Some(snapshot) = self.snapshot.get() {
            debug!(target_module = SOURCE, result = "hit", "summary cache");
            return Ok(snapshot);
        }

        let source = &self.source;
        self.snapshot
            .get_or_try_load(|| async move {
                debug!(target_module = SOURCE, result = "miss", "summary cache");
                let payloads = source.fetch_summaries().await?;
                let posts = payloads
                    .into_iter()
                    .map(|payload| PostSummary::try_from(payload).map(Arc::new))
                    .collect::<Result<Vec<_>, _>>()?;
                let index = CategoryIndex::rebuild(&posts);
                info!(
                    target_module = SOURCE,
                    posts = posts.len(),
                    categories = index.len(),
                    "summary list loaded"
                );
                Ok::<_, AppError>(SummarySnapshot {
                    posts: posts.into(),
                    index,
                })
            })
            .await
            .inspect_err(|err| {
                warn!(target_module = SOURCE, error = %err, "failed to load summary list");
            })
    }
}
