//! Cache Store Module
//!
//! Bulk entity list with per-tag position indices and a single expiration
//! instant covering the whole dataset.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, trace};

use crate::error::{CoreError, Result};

// == Pageable ==
/// An entity that can be cached, partitioned by tag and looked up by key.
pub trait Pageable {
    /// Discriminator used to build per-partition indices.
    type Tag: Copy + Eq + Hash + Debug;

    /// Partition of this entity. `None` keeps it out of every index.
    fn tag(&self) -> Option<Self::Tag>;

    /// Identifier used by [`CacheStore::entry`].
    fn key(&self) -> Option<u32>;
}

// == Cache Store ==
/// Time-expiring store for one dataset.
///
/// The dataset is replaced wholesale on every `set_data`; tag indices are
/// rebuilt from scratch at the same time so no index outlives its data.
#[derive(Debug)]
pub struct CacheStore<T: Pageable> {
    /// Entities in the order of the last `set_data` call
    bulk: Vec<T>,
    /// Positions into `bulk`, per requested tag
    indices: HashMap<T::Tag, Vec<usize>>,
    /// Expiration timestamp (Unix milliseconds)
    expires_at: u64,
    /// Lifetime granted by a non-empty `set_data`
    ttl_seconds: u64,
}

impl<T: Pageable + Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates an empty, already expired store.
    pub fn new(ttl_seconds: u64) -> Self {
        debug!("Created cache store: ttl [{}s]", ttl_seconds);
        Self {
            bulk: Vec::new(),
            indices: HashMap::new(),
            expires_at: 0,
            ttl_seconds,
        }
    }

    // == Is Valid ==
    /// True while the data has not expired and is non-empty.
    pub fn is_valid(&self) -> bool {
        let valid = current_timestamp_ms() < self.expires_at && !self.bulk.is_empty();
        trace!("Data valid: [{}]", valid);
        valid
    }

    // == Invalidate ==
    /// Expires the store and evicts all data and indices.
    pub fn invalidate(&mut self) {
        debug!("Invalidating and evicting cache");
        self.expires_at = 0;
        self.bulk.clear();
        self.indices.clear();
    }

    // == Set Data ==
    /// Replaces the dataset, indexing it for each of `tags`.
    ///
    /// `None` is rejected. An empty dataset clears the store but leaves the
    /// expiration untouched, so it never makes a stale cache valid again.
    pub fn set_data(&mut self, items: Option<Vec<T>>, tags: &[T::Tag]) -> Result<()> {
        let Some(items) = items else {
            return Err(CoreError::InvalidArgument(
                "Pageable data can't be set to null".to_string(),
            ));
        };

        debug!(
            "Setting [{}] entries, indexing for [{}] tags",
            items.len(),
            tags.len()
        );

        self.bulk = items;
        self.indices.clear();

        if !self.bulk.is_empty() {
            self.rebuild_indices(tags);
            self.expires_at = current_timestamp_ms() + self.ttl_seconds * 1000;
            debug!("Expiration timestamp set: [{}]", self.expires_at);
        }

        Ok(())
    }

    fn rebuild_indices(&mut self, tags: &[T::Tag]) {
        if tags.is_empty() {
            debug!("No tags passed. Indexing skipped");
            return;
        }

        for tag in tags {
            self.indices.insert(*tag, Vec::new());
        }

        let mut indexed = 0;
        for (position, item) in self.bulk.iter().enumerate() {
            match item.tag().and_then(|tag| self.indices.get_mut(&tag)) {
                Some(index) => {
                    index.push(position);
                    indexed += 1;
                }
                None => trace!("No index requested for [{:?}]. Skipped", item.tag()),
            }
        }

        info!(
            "Indexed [{}] of [{}] items for [{}] tag(s)",
            indexed,
            self.bulk.len(),
            self.indices.len()
        );
    }

    /// Entities under `tags`, concatenated in the order the tags are given.
    fn indexed(&self, tags: &[T::Tag]) -> Vec<&T> {
        tags.iter()
            .filter_map(|tag| self.indices.get(tag))
            .flat_map(|positions| positions.iter().map(|&i| &self.bulk[i]))
            .collect()
    }

    // == Sub List ==
    /// Entities in `from..to` of the bulk list, or of the tagged view when
    /// `tags` is non-empty.
    ///
    /// Callers clamp the range first; a range outside the data yields an
    /// empty list.
    pub fn sub_list(&self, from: usize, to: usize, tags: &[T::Tag]) -> Vec<T> {
        if tags.is_empty() {
            return self
                .bulk
                .get(from..to)
                .map(<[T]>::to_vec)
                .unwrap_or_default();
        }

        self.indexed(tags)
            .get(from..to)
            .map(|slice| slice.iter().map(|&item| item.clone()).collect::<Vec<T>>())
            .unwrap_or_default()
    }

    // == Data ==
    /// All entities, or those indexed under `tags`.
    pub fn data(&self, tags: &[T::Tag]) -> Vec<&T> {
        if tags.is_empty() {
            return self.bulk.iter().collect();
        }
        self.indexed(tags)
    }

    // == Entry ==
    /// First entity whose key equals `key`.
    pub fn entry(&self, key: u32) -> Option<&T> {
        self.bulk.iter().find(|item| item.key() == Some(key))
    }

    // == Size ==
    pub fn size(&self, tags: &[T::Tag]) -> usize {
        if tags.is_empty() {
            return self.bulk.len();
        }
        tags.iter()
            .filter_map(|tag| self.indices.get(tag))
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self, tags: &[T::Tag]) -> bool {
        self.size(tags) == 0
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
