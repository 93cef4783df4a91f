//! Tile cache for rendered PNG tiles.
//!
//! Rendering a tile decodes the full source image, so repeated requests are
//! served from memory instead.
//!
//! # Cache Key
//!
//! Tiles are keyed by the full raw request path, modifiers included. Two
//! paths that decode to the same parameters (`a.png.lowres.saturated` and
//! `a.png.saturated.lowres`) are separate entries.
//!
//! # Eviction
//!
//! By default the cache is unbounded: entries live for the rest of the
//! process and are never refreshed, even if the source file changes on disk.
//! A cache built with [`TileCache::with_max_entries`] instead evicts the
//! least-recently-used entry once the entry limit is reached.

use std::num::NonZeroUsize;
use std::time::SystemTime;

use bytes::Bytes;
use lru::LruCache;
use tokio::sync::RwLock;

// =============================================================================
// Cached Tile
// =============================================================================

/// A rendered tile held in the cache.
#[derive(Debug, Clone)]
pub struct CachedTile {
    /// PNG-encoded tile
    pub data: Bytes,

    /// When the entry was written
    pub last_access: SystemTime,
}

impl CachedTile {
    fn new(data: Bytes) -> Self {
        Self {
            data,
            last_access: SystemTime::now(),
        }
    }
}

// =============================================================================
// Tile Cache
// =============================================================================

/// Cache of rendered tiles keyed by raw request path.
///
/// # Thread Safety
///
/// The cache is thread-safe and can be shared across async tasks via `Arc`.
/// It does not coordinate concurrent misses: two requests for the same cold
/// path may both render, and the later `put` replaces the earlier entry.
///
/// # Example
///
/// ```
/// use plate_server::tile::TileCache;
/// use bytes::Bytes;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = TileCache::new();
///
///     let png = Bytes::from_static(b"\x89PNG\r\n\x1a\n");
///     cache.put("plate_1/A01.png.lowres", png.clone()).await;
///
///     assert_eq!(cache.get("plate_1/A01.png.lowres").await, Some(png));
///     assert_eq!(cache.get("plate_1/A01.png").await, None);
/// }
/// ```
pub struct TileCache {
    entries: RwLock<LruCache<String, CachedTile>>,

    /// Entry limit; `None` means unbounded
    max_entries: Option<NonZeroUsize>,
}

impl TileCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(LruCache::unbounded()),
            max_entries: None,
        }
    }

    /// Create a cache that holds at most `max_entries` tiles, evicting the
    /// least recently used.
    pub fn with_max_entries(max_entries: NonZeroUsize) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(max_entries)),
            max_entries: Some(max_entries),
        }
    }

    /// Create a cache from an optional limit.
    pub fn with_limit(max_entries: Option<NonZeroUsize>) -> Self {
        match max_entries {
            Some(max) => Self::with_max_entries(max),
            None => Self::new(),
        }
    }

    /// Get a tile from the cache.
    ///
    /// In bounded mode this marks the entry as recently used. In unbounded
    /// mode the entry is only read.
    pub async fn get(&self, raw_path: &str) -> Option<Bytes> {
        if self.max_entries.is_none() {
            let entries = self.entries.read().await;
            return entries.peek(raw_path).map(|tile| tile.data.clone());
        }

        let mut entries = self.entries.write().await;
        entries.get(raw_path).map(|tile| tile.data.clone())
    }

    /// Check if a tile is cached without updating LRU order.
    pub async fn contains(&self, raw_path: &str) -> bool {
        let entries = self.entries.read().await;
        entries.contains(raw_path)
    }

    /// Get the time the entry for `raw_path` was written.
    pub async fn last_access(&self, raw_path: &str) -> Option<SystemTime> {
        let entries = self.entries.read().await;
        entries.peek(raw_path).map(|tile| tile.last_access)
    }

    /// Store a tile, recording the current time.
    ///
    /// An existing entry for the same path is replaced.
    pub async fn put(&self, raw_path: impl Into<String>, data: Bytes) {
        let mut entries = self.entries.write().await;
        entries.put(raw_path.into(), CachedTile::new(data));
    }

    /// Get the current number of cached tiles.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        let entries = self.entries.read().await;
        entries.is_empty()
    }

    /// Get the total size of cached tiles in bytes.
    pub async fn size(&self) -> usize {
        let entries = self.entries.read().await;
        entries.iter().map(|(_, tile)| tile.data.len()).sum()
    }

    /// Get the entry limit, or `None` if unbounded.
    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries.map(NonZeroUsize::get)
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
