//! Site paths and the views they map to.
//!
//! Besides the current layout (`/`, `/post/<id>`, `/category/<name>`,
//! `/about`) the old blog host linked posts as `/<year>/<month>/<id>.html`;
//! those paths still resolve to the post view.

use serde::Serialize;

use super::posts::{has_legacy_suffix, strip_legacy_suffix};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "key", rename_all = "snake_case")]
pub enum Route {
    Summary,
    Post(String),
    Category(String),
    About,
}

impl Route {
    /// Map a site path onto a view. Returns `None` for unknown paths.
    pub fn resolve(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Self::Summary),
            ["about"] => Some(Self::About),
            ["post", id] => Some(Self::post(id)),
            ["category", name] => Some(Self::Category((*name).to_string())),
            [year, month, file] if is_legacy_post(year, month, file) => Some(Self::post(file)),
            _ => None,
        }
    }

    fn post(id: &str) -> Self {
        Self::Post(strip_legacy_suffix(id).to_string())
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Summary => "/".to_string(),
            Self::Post(id) => format!("/post/{id}"),
            Self::Category(name) => format!("/category/{name}"),
            Self::About => "/about".to_string(),
        }
    }
}

fn is_legacy_post(year: &str, month: &str, file: &str) -> bool {
    has_digit_run(year, 4) && has_digit_run(month, 2) && has_legacy_suffix(file)
}

fn has_digit_run(segment: &str, len: usize) -> bool {
    let mut run = 0;
    for b in segment.bytes() {
        run = if b.is_ascii_digit() { run + 1 } else { 0 };
        if run == len {
            return true;
        }
    }
    false
}
