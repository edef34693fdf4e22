use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::application::{error::AppError, posts::PostStore, summary::SummaryIndex};
use crate::config::SiteSettings;
use crate::domain::error::DomainError;
use crate::domain::posts::{newest_first, strip_legacy_suffix};
use crate::domain::routes::Route;
use crate::presentation::views::{
    AboutView, CategoriesView, CategoryView, PostView, RenderedView, SnippetView, SummaryEntry,
    SummaryView,
};

const SOURCE: &str = "application::pages::BlogPages";

/// Builds each page from the two data services.
#[derive(Clone)]
pub struct BlogPages {
    posts: Arc<PostStore>,
    summaries: Arc<SummaryIndex>,
    site: SiteSettings,
}

impl BlogPages {
    pub fn new(posts: Arc<PostStore>, summaries: Arc<SummaryIndex>, site: SiteSettings) -> Self {
        Self {
            posts,
            summaries,
            site,
        }
    }

    /// Listing in source order. With `snippets`, each shown post is fetched
    /// too; a post that fails to load keeps its plain entry.
    pub async fn summary(
        &self,
        limit: Option<usize>,
        snippets: bool,
    ) -> Result<SummaryView, AppError> {
        let posts = self.summaries.get_summaries().await?;
        let shown = limit.map_or(posts.len(), |limit| limit.min(posts.len()));

        let mut entries = posts[..shown]
            .iter()
            .map(|summary| SummaryEntry::from_summary(summary, self.site.timezone))
            .collect::<Result<Vec<_>, _>>()?;

        if snippets {
            let loaded = join_all(entries.iter().map(|entry| self.posts.get_post(&entry.id))).await;
            for (entry, post) in entries.iter_mut().zip(loaded) {
                match post {
                    Ok(post) => {
                        entry.snippet = Some(SnippetView::from_post(&post, self.site.timezone)?);
                    }
                    Err(err) => warn!(
                        target_module = SOURCE,
                        post_id = %entry.id,
                        error = %err,
                        "snippet unavailable"
                    ),
                }
            }
        }

        Ok(SummaryView {
            site_title: self.site.title.clone(),
            total: posts.len(),
            entries,
        })
    }

    pub async fn post(&self, id: &str) -> Result<PostView, AppError> {
        let post = self.posts.get_post(strip_legacy_suffix(id)).await?;
        PostView::from_post(&post, &self.site.title, self.site.timezone)
    }

    /// Posts of one category, newest first. Unknown names are `NotFound`.
    pub async fn category(&self, name: &str) -> Result<CategoryView, AppError> {
        let mut category = self
            .summaries
            .get_category(name)
            .await?
            .ok_or_else(|| DomainError::not_found("category", name))?;
        newest_first(&mut category.posts);
        CategoryView::from_category(&category, self.site.timezone)
    }

    pub async fn categories(&self) -> Result<CategoriesView, AppError> {
        let categories = self.summaries.get_category_names().await?;
        Ok(CategoriesView::from_categories(&categories))
    }

    pub fn about(&self) -> AboutView {
        AboutView {
            site_title: self.site.title.clone(),
            about: self.site.about.clone(),
        }
    }

    /// Resolve a site path and build the page it names.
    pub async fn route(&self, path: &str) -> Result<RenderedView, AppError> {
        let route = Route::resolve(path).ok_or_else(|| DomainError::not_found("path", path))?;
        self.render(&route).await
    }

    pub async fn render(&self, route: &Route) -> Result<RenderedView, AppError> {
        Ok(match route {
            Route::Summary => RenderedView::Summary(self.summary(None, false).await?),
            Route::Post(id) => RenderedView::Post(self.post(id).await?),
            Route::Category(name) => RenderedView::Category(self.category(name).await?),
            Route::About => RenderedView::About(self.about()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ErrorKind;
    use crate::application::repos::ContentSource;
    use crate::application::testing::{FakeSource, post, summary};

    fn pages(source: FakeSource) -> (Arc<FakeSource>, BlogPages) {
        let source = Arc::new(source);
        let shared = Arc::clone(&source) as Arc<dyn ContentSource>;
        let pages = BlogPages::new(
            Arc::new(PostStore::new(Arc::clone(&shared))),
            Arc::new(SummaryIndex::new(shared)),
            SiteSettings::default(),
        );
        (source, pages)
    }

    fn listing() -> FakeSource {
        FakeSource::with_summaries(vec![
            summary("p1", "2024-01-01T00:00:00Z", &["news"]),
            summary("p2", "2024-02-01T00:00:00Z", &["news", "rust"]),
            summary("p3", "2024-03-01T00:00:00Z", &["rust"]),
        ])
    }

    #[tokio::test]
    async fn summary_keeps_source_order_and_limits() {
        let (_, pages) = pages(listing());
        let view = pages.summary(Some(2), false).await.expect("summary");

        let ids: Vec<&str> = view.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2"]);
        assert_eq!(view.total, 3);
        assert!(view.entries.iter().all(|e| e.snippet.is_none()));
    }

    #[tokio::test]
    async fn snippets_load_posts_and_tolerate_failures() {
        let source = listing()
            .with_post(post("p1", "2024-01-01T00:00:00Z", "<p>one</p>"))
            .with_post(post("p3", "2024-03-01T00:00:00Z", "<p>three</p>"));
        let (source, pages) = pages(source);

        let view = pages.summary(None, true).await.expect("summary");

        assert_eq!(
            view.entries[0].snippet.as_ref().map(|s| s.content.as_str()),
            Some("<p>one</p>")
        );
        assert!(view.entries[1].snippet.is_none());
        assert!(view.entries[2].snippet.is_some());
        assert_eq!(source.post_calls(), 3);
    }

    #[tokio::test]
    async fn category_is_sorted_newest_first() {
        let (_, pages) = pages(listing());
        let view = pages.category("news").await.expect("news");

        let ids: Vec<&str> = view.posts.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["p2", "p1"]);
    }

    #[tokio::test]
    async fn unknown_category_is_not_found() {
        let (_, pages) = pages(listing());
        let err = pages.category("nonexistent").await.expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn categories_list_counts_in_index_order() {
        let (source, pages) = pages(listing());
        let view = pages.categories().await.expect("categories");

        let counts: Vec<(&str, usize)> = view
            .categories
            .iter()
            .map(|c| (c.name.as_str(), c.count))
            .collect();
        assert_eq!(counts, [("news", 2), ("rust", 2)]);

        pages.summary(None, false).await.expect("summary");
        assert_eq!(source.summary_calls(), 1);
    }

    #[tokio::test]
    async fn post_page_accepts_legacy_ids() {
        let source =
            FakeSource::default().with_post(post("some-post", "2013-05-06T21:40:00Z", "<p>x</p>"));
        let (source, pages) = pages(source);

        let view = pages.post("some-post.html").await.expect("post");
        assert_eq!(view.document_title, "Title of some-post | Alphanumeric Sheep Pig");
        assert_eq!(view.published_date, "Monday, 6 May 2013");
        assert_eq!(view.published_time, "9:40 PM");

        pages.post("some-post").await.expect("cached");
        assert_eq!(source.post_calls(), 1);
    }

    #[tokio::test]
    async fn routes_render_the_matching_page() {
        let source = listing().with_post(post("some-post", "2013-05-06T21:40:00Z", ""));
        let (_, pages) = pages(source);

        let view = pages.route("/2013/05/some-post.html").await.expect("legacy");
        assert!(matches!(view, RenderedView::Post(ref p) if p.id == "some-post"));

        let view = pages.route("/category/rust").await.expect("category");
        assert!(matches!(view, RenderedView::Category(ref c) if c.posts.len() == 2));

        assert!(matches!(
            pages.route("/about").await.expect("about"),
            RenderedView::About(_)
        ));

        let err = pages.route("/tags/rust").await.expect_err("unknown");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
