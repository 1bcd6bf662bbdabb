//! State Tracker Module
//!
//! Bounded, LRU-evicting map from an entity id to one tracked field, used to
//! notice when that field changed between a read and a later write.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;

use tracing::{debug, error, trace};

use crate::cache::LruTracker;
use crate::error::{CoreError, Result};

/// Capacity used when the caller has no preference.
pub const DEFAULT_TRACKER_CAPACITY: usize = 64;

// == State Tracker ==
/// Remembers the last observed value of one field per entity.
///
/// Both `track` and `tracked_field_changed` count as an access for LRU
/// purposes. Once more than `capacity` ids are held the least recently used
/// one is dropped, so an evicted entity reports a change on its next check.
pub struct StateTracker<T, K, V> {
    /// Projection to the entity id
    id_of: fn(&T) -> Option<K>,
    /// Projection to the tracked field
    field_of: fn(&T) -> Option<V>,
    /// Last observed field value per id
    values: HashMap<K, V>,
    /// Access order of ids
    lru: LruTracker<K>,
    capacity: usize,
    evictions: u64,
}

impl<T, K: Debug, V: Debug> fmt::Debug for StateTracker<T, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateTracker")
            .field("values", &self.values)
            .field("capacity", &self.capacity)
            .field("evictions", &self.evictions)
            .finish_non_exhaustive()
    }
}

impl<T, K, V> StateTracker<T, K, V>
where
    T: Debug,
    K: Hash + Eq + Clone + Debug,
    V: PartialEq + Debug,
{
    // == Constructor ==
    /// Creates a tracker holding at most `capacity` ids.
    pub fn new(capacity: usize, id_of: fn(&T) -> Option<K>, field_of: fn(&T) -> Option<V>) -> Self {
        debug!("State tracker initialized with capacity of [{}]", capacity);
        Self {
            id_of,
            field_of,
            values: HashMap::new(),
            lru: LruTracker::new(),
            capacity,
            evictions: 0,
        }
    }

    // == Track ==
    /// Records the current field value of `entity`, marking it most recently used.
    pub fn track(&mut self, entity: &T) -> Result<()> {
        let Some((id, value)) = self.project(entity) else {
            error!("Tracking request for [{:?}] failed", entity);
            return Err(CoreError::InvalidArgument(
                "Cannot track non-trackable entity".to_string(),
            ));
        };

        trace!("Stored entry [{:?}, {:?}]", id, value);
        self.values.insert(id.clone(), value);
        self.lru.touch(&id);

        while self.values.len() > self.capacity {
            match self.lru.evict_oldest() {
                Some(oldest) => {
                    trace!("Removing least recently used entry [{:?}]", oldest);
                    self.values.remove(&oldest);
                    self.evictions += 1;
                }
                None => break,
            }
        }

        Ok(())
    }

    // == Track All ==
    /// Tracks every entity in order.
    ///
    /// An absent list is rejected up front. A bad entity aborts the batch at
    /// that point; entities before it stay tracked.
    pub fn track_all(&mut self, entities: Option<&[T]>) -> Result<()> {
        let Some(entities) = entities else {
            error!("Received null as entity list");
            return Err(CoreError::InvalidArgument(
                "Null entity list cannot be processed".to_string(),
            ));
        };

        for entity in entities {
            self.track(entity)?;
        }
        Ok(())
    }

    // == Tracked Field Changed ==
    /// Returns true unless a cached value exists for the entity's id and equals
    /// its current field value.
    pub fn tracked_field_changed(&mut self, entity: &T) -> Result<bool> {
        let Some((id, value)) = self.project(entity) else {
            error!("State check request failed. Entity non-trackable [{:?}]", entity);
            return Err(CoreError::InvalidArgument(
                "Cannot check state. Entity non-trackable".to_string(),
            ));
        };

        let changed = match self.values.get(&id) {
            Some(cached) => {
                debug!("Returning value [{:?}] for key [{:?}]", cached, id);
                self.lru.touch(&id);
                *cached != value
            }
            None => true,
        };
        Ok(changed)
    }

    fn project(&self, entity: &T) -> Option<(K, V)> {
        Some(((self.id_of)(entity)?, (self.field_of)(entity)?))
    }

    /// Number of ids currently tracked.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of ids dropped to stay within capacity.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}
