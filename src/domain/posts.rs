use std::sync::Arc;

use time::{format_description::FormatItem, macros::format_description};

use super::entities::PostSummary;

pub const LONG_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[weekday repr:long], [day padding:none] [month repr:long] [year]");
pub const CLOCK_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period case:upper]");
pub const SHORT_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:none] [month repr:short] [year]");

const LEGACY_SUFFIX: &str = ".html";

/// Order summaries newest first. Equal timestamps keep their relative order.
pub fn newest_first(posts: &mut [Arc<PostSummary>]) {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Drop the `.html` suffix carried by links from the old blog host.
pub fn strip_legacy_suffix(id: &str) -> &str {
    id.strip_suffix(LEGACY_SUFFIX).unwrap_or(id)
}

pub fn has_legacy_suffix(segment: &str) -> bool {
    segment.len() > LEGACY_SUFFIX.len() && segment.ends_with(LEGACY_SUFFIX)
}
