//! Core library for the sliding-tile picture puzzle.
//! Defines the tile and grid data structures, the puzzle state machine,
//! the scramble walk and the session clock. Nothing here knows about pixels:
//! tile bitmaps are an opaque type parameter shared behind an `Arc`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session elapsed-time tracking and the clock string formatter.
pub mod clock;
/// Square grid storage and row-major neighbour arithmetic.
pub mod grid;
/// The puzzle state machine: legal moves, move application, solved detection.
pub mod puzzle;
/// Random walk of legal moves producing a solvable start position.
pub mod scramble;
/// Finished-game results and best-record bookkeeping.
pub mod score;
/// Single-writer game session plus its shared, ticking wrapper.
pub mod session;
/// Tile identities and tile values.
pub mod tile;
/// Cancellable background task driving the session clock.
pub mod ticker;

pub use crate::clock::{format_clock, SessionClock};
pub use crate::grid::{canonical_empty_index, Grid, SlotGrid};
pub use crate::puzzle::{MoveOutcome, PuzzleState, Slot};
pub use crate::scramble::{default_scramble_steps, scramble, ScrambleReport};
pub use crate::score::{BestRecords, GameResult, RecordUpdate};
pub use crate::session::{
    GameSession, LiveSession, SessionConfig, SessionConfigBuilder, SessionEvent, SessionListener,
    SharedSession,
};
pub use crate::ticker::ClockTicker;
pub use crate::tile::{Tile, TileId};

/// Smallest grid the engine accepts. A 1x1 grid would consist of nothing but the gap.
pub const MIN_GRID_SIZE: usize = 2;

/// Errors that can occur while setting up a puzzle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// The source image could not be turned into `grid_size²` tiles.
    /// Carries the requested grid size and the number of tiles actually produced.
    #[error("Decomposition failed: expected {expected} tiles for a {grid_size}x{grid_size} grid, got {tiles}")]
    DecompositionFailure {
        /// Requested grid side.
        grid_size: usize,
        /// Tiles required (`grid_size²`, or 0 when the grid size itself is invalid).
        expected: usize,
        /// Tiles actually supplied.
        tiles: usize,
    },
}

/// Product difficulty levels, each mapping to a fixed grid side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Difficulty {
    /// 3x3 grid.
    #[default]
    Easy,
    /// 4x4 grid.
    Medium,
    /// 5x5 grid.
    Hard,
}

impl Difficulty {
    /// Grid side used for this difficulty.
    pub const fn grid_size(self) -> usize {
        match self {
            Self::Easy => 3,
            Self::Medium => 4,
            Self::Hard => 5,
        }
    }

    /// Maps a grid side back to a difficulty, if it is one of the product sizes.
    pub const fn from_grid_size(grid_size: usize) -> Option<Self> {
        match grid_size {
            3 => Some(Self::Easy),
            4 => Some(Self::Medium),
            5 => Some(Self::Hard),
            _ => None,
        }
    }
}
