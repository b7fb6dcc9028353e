//! Remote tile source descriptions and the local tile cache.
//!
//! A tile source names a remote provider: a hostname pool served
//! round-robin, protocol, port, zoom range and a per-provider parallel
//! request limit. The map layer requests tiles lazily by (zoom, x, y);
//! fetched tile bytes go through [`TileCache`] so revisiting a workout
//! does not re-download its map area.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use lru::LruCache;
use once_cell::sync::Lazy;

use crate::error::{Result, TrackViewError};

/// Default number of tiles kept in the local cache. A full screen is
/// around 30 tiles; this holds a few zoom levels of one route area.
pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 256;

/// A named remote tile provider.
#[derive(Debug)]
pub struct TileSource {
    name: &'static str,
    hostnames: &'static [&'static str],
    protocol: &'static str,
    port: u16,
    /// Path segment between the host and the `{z}/{x}/{y}.png` part
    path_prefix: &'static str,
    zoom_min: u8,
    zoom_max: u8,
    parallel_requests_limit: u32,
    next_host: AtomicUsize,
}

impl TileSource {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn zoom_min(&self) -> u8 {
        self.zoom_min
    }

    pub fn zoom_max(&self) -> u8 {
        self.zoom_max
    }

    /// How many tile downloads the provider tolerates in flight at once.
    pub fn parallel_requests_limit(&self) -> u32 {
        self.parallel_requests_limit
    }

    /// Next hostname from the pool, round-robin.
    fn host(&self) -> &'static str {
        let i = self.next_host.fetch_add(1, Ordering::Relaxed);
        self.hostnames[i % self.hostnames.len()]
    }

    /// Build the download URL for a tile.
    ///
    /// Rejects zoom levels outside the provider's supported range.
    pub fn tile_url(&self, zoom: u8, x: u32, y: u32) -> Result<String> {
        if zoom < self.zoom_min || zoom > self.zoom_max {
            return Err(TrackViewError::TileSource {
                message: format!(
                    "zoom {} outside {}..={} for '{}'",
                    zoom, self.zoom_min, self.zoom_max, self.name
                ),
            });
        }
        Ok(format!(
            "{}://{}:{}{}/{}/{}/{}.png",
            self.protocol,
            self.host(),
            self.port,
            self.path_prefix,
            zoom,
            x,
            y
        ))
    }
}

/// OpenStreetMap's standard Mapnik rendering.
pub static MAPNIK: TileSource = TileSource {
    name: "OSM Mapnik",
    hostnames: &[
        "a.tile.openstreetmap.org",
        "b.tile.openstreetmap.org",
        "c.tile.openstreetmap.org",
    ],
    protocol: "https",
    port: 443,
    path_prefix: "",
    zoom_min: 0,
    zoom_max: 19,
    parallel_requests_limit: 8,
    next_host: AtomicUsize::new(0),
};

/// The Humanitarian OSM style, used while recording.
pub static HUMANITARIAN: TileSource = TileSource {
    name: "OSM Humanitarian",
    hostnames: &["a.tile.openstreetmap.fr", "b.tile.openstreetmap.fr"],
    protocol: "https",
    port: 443,
    path_prefix: "/hot",
    zoom_min: 0,
    zoom_max: 17,
    parallel_requests_limit: 8,
    next_host: AtomicUsize::new(0),
};

static REGISTRY: Lazy<HashMap<&'static str, &'static TileSource>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static TileSource> = HashMap::new();
    m.insert(MAPNIK.name, &MAPNIK);
    m.insert(HUMANITARIAN.name, &HUMANITARIAN);
    m
});

/// Look up a built-in tile source by its display name.
pub fn tile_source_by_name(name: &str) -> Option<&'static TileSource> {
    REGISTRY.get(name).copied()
}

// ============================================================================
// Local Tile Cache
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TileKey {
    source: &'static str,
    zoom: u8,
    x: u32,
    y: u32,
}

/// LRU cache of fetched tile bytes, keyed by (source, zoom, x, y).
pub struct TileCache {
    cache: LruCache<TileKey, Vec<u8>>,
    hits: u64,
    misses: u64,
}

impl TileCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Store the bytes of a downloaded tile.
    pub fn put(&mut self, source: &TileSource, zoom: u8, x: u32, y: u32, bytes: Vec<u8>) {
        self.cache.put(
            TileKey {
                source: source.name,
                zoom,
                x,
                y,
            },
            bytes,
        );
    }

    /// Fetch a cached tile, refreshing its recency.
    pub fn get(&mut self, source: &TileSource, zoom: u8, x: u32, y: u32) -> Option<&[u8]> {
        let key = TileKey {
            source: source.name,
            zoom,
            x,
            y,
        };
        match self.cache.get(&key) {
            Some(bytes) => {
                self.hits += 1;
                Some(bytes.as_slice())
            }
            None => {
                self.misses += 1;
                debug!("[TileCache] miss {}/{}/{}/{}", key.source, zoom, x, y);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// (hits, misses) since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_CACHE_CAPACITY)
    }
}
