//! LRU cache for rendered pages
//!
//! Close/reopen of the sheet keeps the loader alive, and the cache lets a
//! remounted content host re-display pages without re-rasterizing them.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::request::RenderParams;
use super::types::PageData;

/// Cache key for rendered pages
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Page number
    pub page: usize,
    /// Scale factor (stored as millionths for stable hashing)
    pub scale_millionths: u32,
}

impl CacheKey {
    /// Create a cache key from render parameters
    #[must_use]
    pub fn from_params(page: usize, params: &RenderParams) -> Self {
        Self {
            page,
            scale_millionths: (params.scale * 1_000_000.0) as u32,
        }
    }
}

/// LRU cache for rendered page data
pub struct PageCache {
    cache: LruCache<CacheKey, Arc<PageData>>,
}

impl PageCache {
    /// Create a new cache with the given capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).expect("1 is non-zero")),
            ),
        }
    }

    /// Get a cached page, promoting it in the LRU order
    #[must_use]
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<PageData>> {
        self.cache.get(key).cloned()
    }

    /// Check if a key is in the cache without promoting it
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.cache.contains(key)
    }

    /// Insert a page into the cache, returning an Arc to the data
    pub fn insert(&mut self, key: CacheKey, data: PageData) -> Arc<PageData> {
        let arc = Arc::new(data);
        self.cache.put(key, arc.clone());
        arc
    }

    /// Number of cached pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Cache capacity
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> RenderParams {
        RenderParams { scale: 1.5 }
    }

    fn test_page_data(page: usize) -> PageData {
        PageData {
            img_data: super::super::types::ImageData {
                pixels: vec![0; 300],
                width_px: 10,
                height_px: 10,
            },
            page_num: page,
            scale_factor: 1.5,
            page_height_px: 100.0,
        }
    }

    #[test]
    fn cache_insert_and_get() {
        let mut cache = PageCache::new(10);
        let params = test_params();
        let key = CacheKey::from_params(0, &params);

        cache.insert(key.clone(), test_page_data(0));

        assert!(cache.contains(&key));
        assert!(cache.get(&key).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_lru_eviction() {
        let mut cache = PageCache::new(2);
        let params = test_params();

        for i in 0..3 {
            let key = CacheKey::from_params(i, &params);
            cache.insert(key, test_page_data(i));
        }

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&CacheKey::from_params(0, &params)));
        assert!(cache.contains(&CacheKey::from_params(1, &params)));
        assert!(cache.contains(&CacheKey::from_params(2, &params)));
    }

    #[test]
    fn scale_changes_produce_distinct_keys() {
        let key_a = CacheKey::from_params(0, &RenderParams { scale: 1.0 });
        let key_b = CacheKey::from_params(0, &RenderParams { scale: 1.25 });
        assert_ne!(key_a, key_b);
    }
}
