use crate::Difficulty;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Summary of a solved game, handed to scoring and sharing collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameResult {
    pub grid_size: usize,
    /// `None` for grid sizes outside the product difficulties.
    pub difficulty: Option<Difficulty>,
    pub moves: u32,
    pub elapsed: Duration,
}

/// Which records a result improved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordUpdate {
    pub best_time: bool,
    pub best_moves: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Best {
    time: Duration,
    moves: u32,
}

/// Best time and fewest moves per grid size, tracked independently.
///
/// Lives in memory only; storing it between runs is up to the caller.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BestRecords {
    by_grid: HashMap<usize, Best>,
}

impl BestRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a result into the records and reports which ones it beat.
    /// Ties do not count as improvements.
    pub fn record(&mut self, result: &GameResult) -> RecordUpdate {
        match self.by_grid.get_mut(&result.grid_size) {
            None => {
                self.by_grid.insert(
                    result.grid_size,
                    Best {
                        time: result.elapsed,
                        moves: result.moves,
                    },
                );
                RecordUpdate {
                    best_time: true,
                    best_moves: true,
                }
            }
            Some(best) => {
                let update = RecordUpdate {
                    best_time: result.elapsed < best.time,
                    best_moves: result.moves < best.moves,
                };
                if update.best_time {
                    best.time = result.elapsed;
                }
                if update.best_moves {
                    best.moves = result.moves;
                }
                update
            }
        }
    }

    pub fn best_time(&self, grid_size: usize) -> Option<Duration> {
        self.by_grid.get(&grid_size).map(|best| best.time)
    }

    pub fn best_moves(&self, grid_size: usize) -> Option<u32> {
        self.by_grid.get(&grid_size).map(|best| best.moves)
    }
}
