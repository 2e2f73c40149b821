//! In-memory thumbnail cache and the ordered gallery listing
//!
//! Both structures are stamped with a [`Generation`]. Clearing the cache
//! starts a new generation, and writes carrying an older stamp are dropped,
//! so a pipeline still running for a previous catalog cannot leak entries
//! into the current one.

use crate::media::Pixels;
use app_db::FileId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Validity stamp for cache writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Whether a thumbnail came from the source media
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailStatus {
    Ready,
    /// Source could not be decoded; `image` is a stand-in
    Placeholder { reason: String },
}

/// Display-ready thumbnail
#[derive(Debug, Clone)]
pub struct ThumbnailEntry {
    pub file_id: FileId,
    pub name: String,
    pub image: Pixels,
    pub status: ThumbnailStatus,
}

impl ThumbnailEntry {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.status, ThumbnailStatus::Placeholder { .. })
    }
}

struct Slot {
    entry: Arc<ThumbnailEntry>,
    last_used: AtomicU64,
}

struct CacheState {
    generation: Generation,
    entries: HashMap<FileId, Slot>,
}

/// Thumbnail cache keyed by file id
pub struct ThumbnailCache {
    state: RwLock<CacheState>,
    /// Recency clock for eviction
    clock: AtomicU64,
    capacity: Option<usize>,
}

impl ThumbnailCache {
    /// Cache that keeps every entry until cleared
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Cache holding at most `capacity` entries, evicting the least recently used
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            state: RwLock::new(CacheState {
                generation: Generation(0),
                entries: HashMap::new(),
            }),
            clock: AtomicU64::new(0),
            capacity: capacity.map(|c| c.max(1)),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Look up a thumbnail. No I/O.
    pub fn get(&self, file_id: FileId) -> Option<Arc<ThumbnailEntry>> {
        let state = self.state.read();
        let slot = state.entries.get(&file_id)?;
        slot.last_used.store(self.tick(), Ordering::Relaxed);
        Some(slot.entry.clone())
    }

    /// Store a thumbnail in the current generation
    pub fn put(&self, entry: ThumbnailEntry) -> Arc<ThumbnailEntry> {
        let mut state = self.state.write();
        self.insert_locked(&mut state, Arc::new(entry))
    }

    /// Store a thumbnail only if `generation` is still current.
    /// Returns `None` when the write was discarded.
    pub fn put_if_current(&self, generation: Generation, entry: ThumbnailEntry) -> Option<Arc<ThumbnailEntry>> {
        let mut state = self.state.write();
        if state.generation != generation {
            return None;
        }
        Some(self.insert_locked(&mut state, Arc::new(entry)))
    }

    fn insert_locked(&self, state: &mut CacheState, entry: Arc<ThumbnailEntry>) -> Arc<ThumbnailEntry> {
        let file_id = entry.file_id;
        state.entries.insert(
            file_id,
            Slot {
                entry: entry.clone(),
                last_used: AtomicU64::new(self.tick()),
            },
        );

        if let Some(capacity) = self.capacity {
            while state.entries.len() > capacity {
                let oldest = state
                    .entries
                    .iter()
                    .filter(|(id, _)| **id != file_id)
                    .min_by_key(|(_, slot)| slot.last_used.load(Ordering::Relaxed))
                    .map(|(id, _)| *id);

                match oldest {
                    Some(id) => {
                        state.entries.remove(&id);
                        tracing::trace!("Evicted thumbnail {}", id);
                    }
                    None => break,
                }
            }
        }

        entry
    }

    /// Drop every entry and start a new generation
    pub fn clear(&self) -> Generation {
        let mut state = self.state.write();
        state.entries.clear();
        state.generation = Generation(state.generation.0 + 1);
        tracing::debug!("Thumbnail cache cleared (generation {})", state.generation.0);
        state.generation
    }

    pub fn generation(&self) -> Generation {
        self.state.read().generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation() == generation
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Snapshot of every cached entry, in no particular order
    pub fn entries(&self) -> Vec<Arc<ThumbnailEntry>> {
        self.state.read().entries.values().map(|s| s.entry.clone()).collect()
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        CacheStats {
            entries: state.entries.len(),
            placeholders: state.entries.values().filter(|s| s.entry.is_placeholder()).count(),
            generation: state.generation.0,
        }
    }
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub placeholders: usize,
    pub generation: u64,
}

/// Ordered list of files whose thumbnails have been committed, in catalog order
pub struct Gallery {
    state: RwLock<(Generation, Vec<FileId>)>,
}

impl Gallery {
    pub fn new() -> Self {
        Self {
            state: RwLock::new((Generation(0), Vec::new())),
        }
    }

    /// Empty the list and accept appends stamped with `generation` only
    pub fn reset(&self, generation: Generation) {
        let mut state = self.state.write();
        state.0 = generation;
        state.1.clear();
    }

    /// Append a file; ignored for a stale generation
    pub fn push(&self, generation: Generation, file_id: FileId) -> bool {
        let mut state = self.state.write();
        if state.0 != generation {
            return false;
        }
        state.1.push(file_id);
        true
    }

    pub fn items(&self) -> Vec<FileId> {
        self.state.read().1.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}
