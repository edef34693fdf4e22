//! View models for the blog pages, printable as text or JSON.

use std::fmt;

use ammonia::Builder as AmmoniaBuilder;
use chrono_tz::Tz;
use serde::Serialize;
use time::OffsetDateTime;

use crate::application::error::AppError;
use crate::domain::entities::{Category, Post, PostSummary};
use crate::domain::posts::{CLOCK_TIME_FORMAT, LONG_DATE_FORMAT, SHORT_DATE_FORMAT};
use crate::domain::routes::Route;
use crate::util::timezone::localize;

/// One rendered page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum RenderedView {
    Summary(SummaryView),
    Post(PostView),
    Category(CategoryView),
    Categories(CategoriesView),
    About(AboutView),
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub site_title: String,
    /// Number of posts in the summary list before any limit.
    pub total: usize,
    pub entries: Vec<SummaryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryEntry {
    pub id: String,
    pub title: String,
    pub path: String,
    pub published: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<SnippetView>,
}

impl SummaryEntry {
    pub fn from_summary(summary: &PostSummary, tz: Tz) -> Result<Self, AppError> {
        Ok(Self {
            id: summary.id.clone(),
            title: summary.title.clone(),
            path: Route::Post(summary.id.clone()).path(),
            published: localize(summary.published_at, tz).format(SHORT_DATE_FORMAT)?,
            published_at: summary.published_at,
            categories: summary.categories.clone(),
            length: summary.length,
            excerpt: summary.excerpt.clone(),
            snippet: None,
        })
    }
}

/// The listing page's expanded form of an entry.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetView {
    pub published_date: String,
    pub published_time: String,
    pub content: String,
}

impl SnippetView {
    pub fn from_post(post: &Post, tz: Tz) -> Result<Self, AppError> {
        let published = localize(post.published_at, tz);
        Ok(Self {
            published_date: published.format(LONG_DATE_FORMAT)?,
            published_time: published.format(CLOCK_TIME_FORMAT)?,
            content: sanitize(&post.content),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub document_title: String,
    pub path: String,
    pub published_date: String,
    pub published_time: String,
    pub updated_date: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub categories: Vec<CategoryLink>,
    pub draft: bool,
    pub content: String,
}

impl PostView {
    pub fn from_post(post: &Post, site_title: &str, tz: Tz) -> Result<Self, AppError> {
        let published = localize(post.published_at, tz);
        let updated = localize(post.updated_at, tz);
        Ok(Self {
            id: post.id.clone(),
            title: post.title.clone(),
            document_title: format!("{} | {site_title}", post.title),
            path: Route::Post(post.id.clone()).path(),
            published_date: published.format(LONG_DATE_FORMAT)?,
            published_time: published.format(CLOCK_TIME_FORMAT)?,
            updated_date: updated.format(LONG_DATE_FORMAT)?,
            published_at: post.published_at,
            updated_at: post.updated_at,
            categories: post
                .categories
                .iter()
                .map(|name| CategoryLink::new(name))
                .collect(),
            draft: post.draft,
            content: sanitize(&post.content),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLink {
    pub name: String,
    pub path: String,
}

impl CategoryLink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: Route::Category(name.to_string()).path(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub name: String,
    pub path: String,
    /// Newest first.
    pub posts: Vec<SummaryEntry>,
}

impl CategoryView {
    /// `category.posts` must already be in display order.
    pub fn from_category(category: &Category, tz: Tz) -> Result<Self, AppError> {
        let posts = category
            .posts
            .iter()
            .map(|summary| SummaryEntry::from_summary(summary, tz))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: category.name.clone(),
            path: Route::Category(category.name.clone()).path(),
            posts,
        })
    }
}

/// Header list of categories.
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesView {
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub path: String,
    pub count: usize,
}

impl CategoriesView {
    pub fn from_categories(categories: &[Category]) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|category| CategoryCount {
                    name: category.name.clone(),
                    path: Route::Category(category.name.clone()).path(),
                    count: category.len(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutView {
    pub site_title: String,
    pub about: String,
}

fn sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();
    builder.add_tags(&["figure", "figcaption", "section"]);
    builder.add_generic_attributes(&["class", "id"]);
    builder.add_generic_attribute_prefixes(&["data-"]);
    builder
}

/// Strip scripts, handlers and unknown markup from post HTML.
pub fn sanitize(html: &str) -> String {
    sanitizer().clean(html).to_string()
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary(view) => fmt::Display::fmt(view, f),
            Self::Post(view) => fmt::Display::fmt(view, f),
            Self::Category(view) => fmt::Display::fmt(view, f),
            Self::Categories(view) => fmt::Display::fmt(view, f),
            Self::About(view) => fmt::Display::fmt(view, f),
        }
    }
}

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.site_title)?;
        if self.total == 0 {
            return writeln!(f, "No posts yet.");
        }
        for entry in &self.entries {
            writeln!(f)?;
            fmt::Display::fmt(entry, f)?;
        }
        if self.entries.len() < self.total {
            writeln!(f)?;
            writeln!(f, "({} of {} posts shown)", self.entries.len(), self.total)?;
        }
        Ok(())
    }
}

impl fmt::Display for SummaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  {}  {}", self.published, self.title, self.path)?;
        if !self.categories.is_empty() {
            writeln!(f, "  categories: {}", self.categories.join(", "))?;
        }
        if let Some(excerpt) = &self.excerpt {
            writeln!(f, "  {excerpt}")?;
        }
        if let Some(snippet) = &self.snippet {
            writeln!(
                f,
                "  {} at {}",
                snippet.published_date, snippet.published_time
            )?;
            writeln!(f, "  {}", snippet.content)?;
        }
        Ok(())
    }
}

impl fmt::Display for PostView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.document_title)?;
        writeln!(f, "{} at {}", self.published_date, self.published_time)?;
        if self.updated_date != self.published_date {
            writeln!(f, "updated {}", self.updated_date)?;
        }
        if !self.categories.is_empty() {
            let names: Vec<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
            writeln!(f, "categories: {}", names.join(", "))?;
        }
        if self.draft {
            writeln!(f, "[draft]")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.content)
    }
}

impl fmt::Display for CategoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Category: {} ({} posts)", self.name, self.posts.len())?;
        for entry in &self.posts {
            writeln!(f, "{}  {}  {}", entry.published, entry.title, entry.path)?;
        }
        Ok(())
    }
}

impl fmt::Display for CategoriesView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.categories.is_empty() {
            return writeln!(f, "No categories.");
        }
        for category in &self.categories {
            writeln!(f, "{} ({})", category.name, category.count)?;
        }
        Ok(())
    }
}

impl fmt::Display for AboutView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "About {}", self.site_title)?;
        writeln!(f)?;
        writeln!(f, "{}", self.about)
    }
}
