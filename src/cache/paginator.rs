//! Paginator Module
//!
//! Turns page requests into clamped slices of a [`CacheStore`].

use serde::Serialize;
use tracing::{debug, trace};

use crate::cache::{CacheStore, Pageable, PaginatorStats};
use crate::error::Result;

/// Entries per page when none (or zero) is configured.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

/// Cache lifetime in seconds for `Paginator::default()`.
pub const DEFAULT_CACHE_TTL: u64 = 60;

// == Page ==
/// One page of entities.
///
/// `page_number` is 0 only for the empty page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page_number: usize,
    pub page_count: usize,
    pub content: Vec<T>,
}

impl<T> Page<T> {
    /// The page returned when there is nothing to show.
    pub fn empty() -> Self {
        Self {
            page_number: 0,
            page_count: 0,
            content: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// == Paginator ==
/// Pages over a cached dataset it exclusively owns.
///
/// Reads never fail: an empty or stale cache yields an empty page and any
/// page number is clamped into range.
#[derive(Debug)]
pub struct Paginator<T: Pageable> {
    cache: CacheStore<T>,
    items_per_page: usize,
    stats: PaginatorStats,
}

impl<T: Pageable + Clone> Paginator<T> {
    // == Constructor ==
    /// Creates a paginator whose cache lives `ttl_seconds` after each refresh.
    ///
    /// An `items_per_page` of zero keeps the default.
    pub fn new(ttl_seconds: u64, items_per_page: usize) -> Self {
        let items_per_page = if items_per_page > 0 {
            items_per_page
        } else {
            DEFAULT_ITEMS_PER_PAGE
        };
        debug!(
            "Created paginator: ttl [{}s], elements per page [{}]",
            ttl_seconds, items_per_page
        );

        Self {
            cache: CacheStore::new(ttl_seconds),
            items_per_page,
            stats: PaginatorStats::new(),
        }
    }

    // == Page ==
    /// Returns page `page_number` of the entities under `tags` (all entities
    /// when `tags` is empty).
    pub fn page(&mut self, page_number: i32, tags: &[T::Tag]) -> Page<T> {
        if self.cache.is_valid() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }

        if self.cache.is_empty(tags) {
            debug!("Cache empty. Returning empty page");
            return Page::empty();
        }

        debug!("Requested page number [{}]", page_number);

        let size = self.cache.size(tags);
        let page_count = self.count_pages(size);
        let page_number = nearest_valid_page(page_number, page_count);

        debug!("Serving page number [{}/{}]", page_number, page_count);

        let from = (page_number - 1) * self.items_per_page;
        let to = (from + self.items_per_page).min(size);

        let page = Page {
            page_number,
            page_count,
            content: self.cache.sub_list(from, to, tags),
        };

        trace!("Page created with [{}] elements", page.len());
        page
    }

    fn count_pages(&self, size: usize) -> usize {
        size.div_ceil(self.items_per_page)
    }

    // == Cache Control ==
    pub fn has_valid_cache(&self) -> bool {
        self.cache.is_valid()
    }

    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
        self.stats.record_invalidation();
        self.stats.set_cached_entries(0);
    }

    /// Replaces the cached dataset; see [`CacheStore::set_data`].
    pub fn set_data(&mut self, items: Option<Vec<T>>, tags: &[T::Tag]) -> Result<()> {
        self.cache.set_data(items, tags)?;

        let size = self.cache.size(&[]);
        if size > 0 {
            self.stats.record_refresh();
        }
        self.stats.set_cached_entries(size);
        Ok(())
    }

    pub fn data(&self, tags: &[T::Tag]) -> Vec<&T> {
        self.cache.data(tags)
    }

    // == Get Entry ==
    /// Looks up a cached entity by key.
    pub fn get_entry(&self, key: u32) -> Option<&T> {
        debug!("Entry requested by key [{}]", key);
        self.cache.entry(key)
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Changes the page size; zero is ignored.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        if items_per_page > 0 {
            self.items_per_page = items_per_page;
        }
    }

    pub fn stats(&self) -> PaginatorStats {
        self.stats.clone()
    }
}

impl<T: Pageable + Clone> Default for Paginator<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, DEFAULT_ITEMS_PER_PAGE)
    }
}

/// Clamps a requested page into `1..=page_count`. `page_count` is at least 1.
fn nearest_valid_page(requested: i32, page_count: usize) -> usize {
    if requested < 1 {
        1
    } else {
        (requested as usize).min(page_count)
    }
}
