//! Plain-text and JSON renderings of the blog pages.

pub mod print;
pub mod views;
