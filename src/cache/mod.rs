//! In-process caches backing the blog services.
//!
//! Everything loaded here is kept for the lifetime of the process: the static
//! API never changes underneath a running reader, so there is no eviction and
//! no invalidation.

mod keyed;
mod load;

pub use keyed::KeyedCells;
pub use load::{LoadCell, LoadStatus};
