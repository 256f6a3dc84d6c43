//! Memoize-once cache for the extracted metrics record.
//!
//! One slot, keyed by the report path. The first [`get_or_compute`] for a path
//! runs the load and stores the record; later calls for the same path return
//! the stored record without touching the file again. Asking for a different
//! path replaces the slot. Failed loads are never stored, so a caller that
//! hits `Data Source Pending` can call again once the file appears.
//!
//! [`get_or_compute`]: MetricsCache::get_or_compute

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::{ExtractionError, MetricsRecord};

#[derive(Debug)]
struct CacheEntry {
    key: PathBuf,
    record: Arc<MetricsRecord>,
}

/// Hit/miss counters for a [`MetricsCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Single-entry cache of one computed [`MetricsRecord`].
///
/// The slot sits behind a `Mutex` so the cache can be shared, but the lock is
/// held across the computation: there is never more than one load in flight.
#[derive(Debug, Default)]
pub struct MetricsCache {
    slot: Mutex<Option<CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached record for `path`, running `compute` on a miss.
    pub fn get_or_compute<F>(
        &self,
        path: &Path,
        compute: F,
    ) -> Result<Arc<MetricsRecord>, ExtractionError>
    where
        F: FnOnce(&Path) -> Result<MetricsRecord, ExtractionError>,
    {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(entry) = slot.as_ref()
            && entry.key == path
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(path = %path.display(), "metrics cache hit");
            return Ok(Arc::clone(&entry.record));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(path = %path.display(), "metrics cache miss");

        let record = Arc::new(compute(path)?);
        *slot = Some(CacheEntry {
            key: path.to_path_buf(),
            record: Arc::clone(&record),
        });
        Ok(record)
    }

    /// The cached record for `path`, if that is the path currently held.
    pub fn get(&self, path: &Path) -> Option<Arc<MetricsRecord>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|entry| entry.key == path)
            .map(|entry| Arc::clone(&entry.record))
    }

    /// Drop the cached record so the next lookup reloads it.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = slot.take() {
            tracing::debug!(path = %entry.key.display(), "metrics cache invalidated");
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn computes_once_per_path() {
        let cache = MetricsCache::new();
        let calls = Cell::new(0);
        let path = Path::new("/reports/fy25.pdf");

        for _ in 0..3 {
            let record = cache
                .get_or_compute(path, |_| {
                    calls.set(calls.get() + 1);
                    Ok(MetricsRecord::with_defaults())
                })
                .unwrap();
            assert_eq!(record.revenue(), dec!(281.7));
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 1 });
    }

    #[test]
    fn hits_share_the_same_allocation() {
        let cache = MetricsCache::new();
        let path = Path::new("a.pdf");
        let first = cache
            .get_or_compute(path, |_| Ok(MetricsRecord::with_defaults()))
            .unwrap();
        let second = cache
            .get_or_compute(path, |_| panic!("should not recompute"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = MetricsCache::new();
        let path = Path::new("missing.pdf");

        let err = cache
            .get_or_compute(path, |_| Err(ExtractionError::source_pending()))
            .unwrap_err();
        assert_eq!(err, ExtractionError::source_pending());
        assert!(cache.get(path).is_none());

        let record = cache
            .get_or_compute(path, |_| Ok(MetricsRecord::with_defaults()))
            .unwrap();
        assert_eq!(*record, MetricsRecord::with_defaults());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn a_new_path_replaces_the_entry() {
        let cache = MetricsCache::new();
        let a = Path::new("a.pdf");
        let b = Path::new("b.pdf");

        cache
            .get_or_compute(a, |_| Ok(MetricsRecord::with_defaults()))
            .unwrap();
        let other = MetricsRecord::derive(dec!(10), dec!(5), dec!(2)).unwrap();
        cache.get_or_compute(b, |_| Ok(other.clone())).unwrap();

        assert!(cache.get(a).is_none());
        assert_eq!(cache.get(b).as_deref(), Some(&other));
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let cache = MetricsCache::new();
        let path = Path::new("a.pdf");
        let calls = Cell::new(0);
        let load = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok(MetricsRecord::with_defaults())
        };

        cache.get_or_compute(path, load).unwrap();
        cache.invalidate();
        assert!(cache.get(path).is_none());
        cache.get_or_compute(path, load).unwrap();
        assert_eq!(calls.get(), 2);
    }
}
