//! Cache Module
//!
//! Session-scoped caching: a TTL-expiring, tag-indexed paging cache and a
//! bounded LRU tracker for detecting field changes between reads.

mod lru;
mod paginator;
mod stats;
mod store;
mod tracker;


// Re-export public types
pub use lru::LruTracker;
pub use paginator::{Page, Paginator, DEFAULT_CACHE_TTL, DEFAULT_ITEMS_PER_PAGE};
pub use stats::PaginatorStats;
pub use store::{current_timestamp_ms, CacheStore, Pageable};
pub use tracker::{StateTracker, DEFAULT_TRACKER_CAPACITY};
