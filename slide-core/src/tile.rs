use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TILE_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a tile.
///
/// Identities are drawn from a process-wide counter, so tiles cut for two different
/// games never compare equal even when they share a `correct_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u64);

impl TileId {
    fn next() -> Self {
        Self(NEXT_TILE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single puzzle piece.
///
/// Tiles are immutable once created. The bitmap is shared behind an `Arc` so moving a
/// tile between slots is a pointer copy.
#[derive(Debug)]
pub struct Tile<B> {
    id: TileId,
    correct_index: usize,
    bitmap: Arc<B>,
}

impl<B> Tile<B> {
    /// Creates a tile with a fresh identity.
    pub fn new(correct_index: usize, bitmap: Arc<B>) -> Self {
        Self {
            id: TileId::next(),
            correct_index,
            bitmap,
        }
    }

    /// Builds one tile per bitmap, using the sequence order as `correct_index`.
    pub fn from_bitmaps(bitmaps: Vec<B>) -> Vec<Self> {
        bitmaps
            .into_iter()
            .enumerate()
            .map(|(index, bitmap)| Self::new(index, Arc::new(bitmap)))
            .collect()
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    /// Row-major position of this tile in the solved layout.
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn bitmap(&self) -> &B {
        &self.bitmap
    }

    /// Shared handle to the bitmap, for renderers that outlive the borrow.
    pub fn bitmap_arc(&self) -> Arc<B> {
        Arc::clone(&self.bitmap)
    }
}

// Manual impls: deriving would require `B: Clone` / `B: PartialEq`.
impl<B> Clone for Tile<B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            correct_index: self.correct_index,
            bitmap: Arc::clone(&self.bitmap),
        }
    }
}

impl<B> PartialEq for Tile<B> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<B> Eq for Tile<B> {}
