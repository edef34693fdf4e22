//! Blog data services and the pages built from them.

pub mod error;
pub mod pages;
pub mod posts;
pub mod repos;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;
