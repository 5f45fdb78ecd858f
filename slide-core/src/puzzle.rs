use crate::grid::{canonical_empty_index, SlotGrid};
use crate::tile::{Tile, TileId};
use crate::{PuzzleError, MIN_GRID_SIZE};
use log::{debug, info, trace};

/// Result of a player move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// The tile slid into the gap.
    pub accepted: bool,
    /// This move completed the puzzle.
    pub solved_now: bool,
}

impl MoveOutcome {
    pub const REJECTED: Self = Self {
        accepted: false,
        solved_now: false,
    };
}

/// Read-only view of one grid cell.
#[derive(Debug)]
pub struct Slot<'a, B> {
    pub index: usize,
    pub occupant: Option<&'a Tile<B>>,
}

/// The sliding puzzle state machine.
///
/// Owns the slot grid and the move counter. Exactly one slot is empty at all times;
/// its index is tracked in `empty` and updated on every swap.
#[derive(Debug, Clone)]
pub struct PuzzleState<B> {
    slots: SlotGrid<B>,
    empty: usize,
    move_count: u32,
    shuffling: bool,
}

impl<B> PuzzleState<B> {
    /// Builds the solved arrangement from bitmaps in decomposition order.
    ///
    /// Tile `i` goes to slot `i`, then the last slot is emptied; its tile is dropped and
    /// the game is played with `grid_size² - 1` tiles.
    ///
    /// # Errors
    ///
    /// Returns `PuzzleError::DecompositionFailure` if `grid_size < 2` or the number of
    /// bitmaps is not exactly `grid_size²`.
    pub fn initialize(bitmaps: Vec<B>, grid_size: usize) -> Result<Self, PuzzleError> {
        let tiles = Tile::from_bitmaps(bitmaps);
        Self::from_tiles(tiles, grid_size)
    }

    /// Like [`PuzzleState::initialize`] but reuses existing tiles (and their identities).
    ///
    /// `tiles` must hold `grid_size²` tiles ordered by `correct_index`; the one at the last
    /// index is discarded.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PuzzleState::initialize`].
    pub fn from_tiles(tiles: Vec<Tile<B>>, grid_size: usize) -> Result<Self, PuzzleError> {
        let expected = grid_size * grid_size;
        if grid_size < MIN_GRID_SIZE || tiles.len() != expected {
            return Err(PuzzleError::DecompositionFailure {
                grid_size,
                expected: if grid_size < MIN_GRID_SIZE { 0 } else { expected },
                tiles: tiles.len(),
            });
        }
        let empty = canonical_empty_index(grid_size);
        let cells: Vec<Option<Tile<B>>> = tiles
            .into_iter()
            .map(|tile| (tile.correct_index() != empty).then_some(tile))
            .collect();
        let slots = SlotGrid::from_cells(grid_size, cells).ok_or(
            PuzzleError::DecompositionFailure {
                grid_size,
                expected,
                tiles: 0,
            },
        )?;
        info!(
            "Initialized {}x{} puzzle with {} tiles",
            grid_size,
            grid_size,
            expected - 1
        );
        Ok(Self {
            slots,
            empty,
            move_count: 0,
            shuffling: false,
        })
    }

    pub fn grid_size(&self) -> usize {
        self.slots.size
    }

    /// Index of the unique empty slot. O(1).
    pub fn empty_index(&self) -> usize {
        self.empty
    }

    /// Player moves accepted since the last reset.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// True only while a scramble walk is being applied.
    pub fn is_shuffling(&self) -> bool {
        self.shuffling
    }

    /// Slots whose occupant may slide into the slot at `empty_index`: its orthogonal
    /// neighbours, ordered up, down, left, right.
    pub fn legal_moves(&self, empty_index: usize) -> Vec<usize> {
        self.slots.neighbors(empty_index)
    }

    /// Legal moves for the current gap.
    pub fn legal_moves_from_empty(&self) -> Vec<usize> {
        self.legal_moves(self.empty)
    }

    /// Whether the tile at `index` is orthogonally adjacent to the gap.
    pub fn can_move(&self, index: usize) -> bool {
        self.legal_moves(self.empty).contains(&index)
    }

    /// The legal-move primitive shared by player moves and the scramble walk.
    ///
    /// Swaps the tile at `index` into the gap. Returns `false` and leaves the grid
    /// untouched when `index` is not adjacent to the gap. Counters are not touched.
    pub fn slide(&mut self, index: usize) -> bool {
        if !self.can_move(index) {
            return false;
        }
        self.slots.swap(index, self.empty);
        self.empty = index;
        true
    }

    /// Applies a player move.
    ///
    /// Rejected when the puzzle is already solved or `index` is not adjacent to the gap.
    /// An accepted move increments the move counter and re-evaluates completion.
    pub fn apply_move(&mut self, index: usize) -> MoveOutcome {
        if self.is_solved() {
            trace!("Move at {} ignored: puzzle already solved", index);
            return MoveOutcome::REJECTED;
        }
        let from = index;
        let to = self.empty;
        if !self.slide(index) {
            trace!("Move at {} rejected: not adjacent to gap at {}", index, to);
            return MoveOutcome::REJECTED;
        }
        self.move_count += 1;
        let solved_now = self.is_solved();
        debug!(
            "Move {}: slot {} -> {}{}",
            self.move_count,
            from,
            to,
            if solved_now { " (solved)" } else { "" }
        );
        MoveOutcome {
            accepted: true,
            solved_now,
        }
    }

    /// Every non-last slot holds the tile cut from that position and the last slot is
    /// empty. Stops at the first mismatch.
    pub fn is_solved(&self) -> bool {
        let last = canonical_empty_index(self.slots.size);
        if self.empty != last {
            return false;
        }
        self.slots.iter().enumerate().all(|(index, slot)| match slot {
            Some(tile) => tile.correct_index() == index,
            None => index == last,
        })
    }

    /// Tile currently in slot `index`.
    pub fn tile_at(&self, index: usize) -> Option<&Tile<B>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Read-only slot views in row-major order.
    pub fn slots(&self) -> impl Iterator<Item = Slot<'_, B>> + '_ {
        self.slots.iter().enumerate().map(|(index, occupant)| Slot {
            index,
            occupant: occupant.as_ref(),
        })
    }

    /// Identities of all tiles in play, sorted. Useful for checking the tile multiset.
    pub fn tile_ids(&self) -> Vec<TileId> {
        let mut ids: Vec<TileId> = self.slots.iter().flatten().map(Tile::id).collect();
        ids.sort();
        ids
    }

    /// `correct_index` of each slot's occupant in row-major order; `None` for the gap.
    pub fn arrangement(&self) -> Vec<Option<usize>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(Tile::correct_index))
            .collect()
    }

    /// Puts every tile back at its solved position. Tile identities are kept.
    pub fn restore_solved(&mut self) {
        let size = self.slots.size;
        let mut cells: Vec<Option<Tile<B>>> = (0..size * size).map(|_| None).collect();
        for tile in self.slots.data.drain(..).flatten() {
            if let Some(cell) = cells.get_mut(tile.correct_index()) {
                *cell = Some(tile);
            }
        }
        self.slots.data = cells;
        self.empty = canonical_empty_index(size);
    }

    pub(crate) fn set_shuffling(&mut self, shuffling: bool) {
        self.shuffling = shuffling;
    }

    pub(crate) fn reset_move_count(&mut self) {
        self.move_count = 0;
    }
}
