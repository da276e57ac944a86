//! Per-segment registry of loaded field data.
//!
//! Uninverting a field walks its whole term dictionary, so loaded field data
//! is kept for as long as its segment is alive. [`FieldDataCache`] maps
//! `(segment, field)` to a shared instance and guarantees that concurrent
//! requests for the same key load it once.
//!
//! The cache does not track segment lifetimes. Whoever closes or replaces a
//! segment calls [`FieldDataCache::invalidate_segment`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ahash::AHashMap;
use fielddata_common::Result;
use fielddata_index::{SegmentId, SegmentReader};
use log::{debug, trace};

use crate::geo_point::GeoPointFieldData;
use crate::options::FieldDataOptions;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    segment: SegmentId,
    field: String,
}

/// A cache entry; its lock is held for the duration of a load.
struct Slot<T> {
    value: Mutex<Option<Arc<T>>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot {
            value: Mutex::new(None),
        }
    }
}

/// Shared, thread-safe map from `(segment, field)` to loaded field data.
///
/// - A successful load is stored and returned to every later caller as the
///   same `Arc`.
/// - Loads of one key are serialized: a caller that arrives while the key is
///   loading waits and then receives the loaded value.
/// - Loads of different keys run concurrently.
/// - A failed load is not stored; the next caller tries again.
pub struct FieldDataCache<T> {
    slots: Mutex<AHashMap<CacheKey, Arc<Slot<T>>>>,
}

impl<T> Default for FieldDataCache<T> {
    fn default() -> Self {
        FieldDataCache {
            slots: Mutex::new(AHashMap::default()),
        }
    }
}

impl<T> fmt::Debug for FieldDataCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDataCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl<T> FieldDataCache<T> {
    pub fn new() -> FieldDataCache<T> {
        Self::default()
    }

    /// Returns the cached value for `(segment, field)`, calling `load` to
    /// produce it if there is none.
    pub fn get_or_load<F>(&self, segment: SegmentId, field: &str, load: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let key = CacheKey {
            segment,
            field: field.to_string(),
        };
        let slot = Arc::clone(self.slots().entry(key.clone()).or_default());

        let mut value = lock(&slot.value);
        if let Some(loaded) = value.as_ref() {
            trace!("field data cache hit for '{field}' in {segment}");
            return Ok(Arc::clone(loaded));
        }

        debug!("field data cache miss for '{field}' in {segment}, loading");
        match load() {
            Ok(loaded) => {
                let loaded = Arc::new(loaded);
                *value = Some(Arc::clone(&loaded));
                Ok(loaded)
            }
            Err(e) => {
                drop(value);
                self.discard_empty(&key, &slot);
                debug!("failed to load field data for '{field}' in {segment}: {e}");
                Err(e)
            }
        }
    }

    /// Returns the cached value for `(segment, field)` without loading.
    ///
    /// Waits if the key is being loaded.
    pub fn get(&self, segment: SegmentId, field: &str) -> Option<Arc<T>> {
        let slot = self.slot(segment, field)?;
        let value = lock(&slot.value);
        value.clone()
    }

    /// Whether a loaded value is stored for `(segment, field)`.
    pub fn contains(&self, segment: SegmentId, field: &str) -> bool {
        self.get(segment, field).is_some()
    }

    /// Drops the entry of one field of a segment. Returns whether an entry
    /// existed.
    pub fn invalidate(&self, segment: SegmentId, field: &str) -> bool {
        let key = CacheKey {
            segment,
            field: field.to_string(),
        };
        let removed = self.slots().remove(&key).is_some();
        if removed {
            debug!("invalidated field data for '{field}' in {segment}");
        }
        removed
    }

    /// Drops every entry of `segment`, returning the number of entries removed.
    pub fn invalidate_segment(&self, segment: SegmentId) -> usize {
        let mut slots = self.slots();
        let before = slots.len();
        slots.retain(|key, _| key.segment != segment);
        let removed = before - slots.len();
        if removed > 0 {
            debug!("invalidated {removed} field data entries of {segment}");
        }
        removed
    }

    pub fn clear(&self) {
        let mut slots = self.slots();
        debug!("clearing {} field data entries", slots.len());
        slots.clear();
    }

    /// Number of entries, including keys whose load is in progress. Keys
    /// whose load failed are not counted.
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, segment: SegmentId, field: &str) -> Option<Arc<Slot<T>>> {
        let key = CacheKey {
            segment,
            field: field.to_string(),
        };
        self.slots().get(&key).cloned()
    }

    /// Removes `slot` from the map after a failed load, unless it has been
    /// replaced, filled, or is awaited by another caller.
    fn discard_empty(&self, key: &CacheKey, slot: &Arc<Slot<T>>) {
        let mut slots = self.slots();
        let Some(current) = slots.get(key) else {
            return;
        };
        // One reference is held by the map, one by the caller.
        if Arc::ptr_eq(current, slot)
            && Arc::strong_count(slot) == 2
            && lock(&slot.value).is_none()
        {
            slots.remove(key);
        }
    }

    fn slots(&self) -> MutexGuard<'_, AHashMap<CacheKey, Arc<Slot<T>>>> {
        lock(&self.slots)
    }
}

impl FieldDataCache<GeoPointFieldData> {
    /// Returns the geo-point field data of `field` in `reader`, loading it
    /// with `options` on a miss.
    pub fn geo_points<R>(
        &self,
        reader: &R,
        field: &str,
        options: &FieldDataOptions,
    ) -> Result<Arc<GeoPointFieldData>>
    where
        R: SegmentReader + ?Sized,
    {
        self.get_or_load(reader.segment_id(), field, || {
            options.load_geo_points(reader, field)
        })
    }
}

/// Locks `mutex`, ignoring poisoning. Guarded state is only replaced whole.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
