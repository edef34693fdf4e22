//! Wire shapes of the static blog API.
//!
//! The API is a tree of JSON files produced by the blog exporter:
//! `summary.json` holds an array of [`PostSummaryPayload`] and
//! `posts/<id>.json` holds one [`PostPayload`]. Timestamps stay in their wire
//! form here; consumers parse them once at load time.

use serde::{Deserialize, Deserializer, Serialize};

/// A timestamp as it appears on the wire.
///
/// The exporter writes ISO-8601 strings, but hand-edited files sometimes carry
/// epoch milliseconds either as a JSON number or as a digit string. Numbers
/// in float form are truncated to whole milliseconds, as a browser `Date`
/// does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Millis(#[serde(deserialize_with = "epoch_millis")] i64),
    Text(String),
}

fn epoch_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    Ok(match Number::deserialize(deserializer)? {
        Number::Int(value) => value,
        #[allow(clippy::cast_possible_truncation)]
        Number::Float(value) => value.trunc() as i64,
    })
}

impl WireTimestamp {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl std::fmt::Display for WireTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Millis(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// One entry of `summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummaryPayload {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "publishedAt")]
    pub published: WireTimestamp,
    /// Length of the rendered content in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Contents of `posts/<id>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(alias = "publishedAt")]
    pub published: WireTimestamp,
    #[serde(alias = "updatedAt")]
    pub updated: WireTimestamp,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}
