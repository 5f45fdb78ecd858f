use crate::tile::Tile;

/// A square grid stored row-major.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    pub size: usize,
    pub(crate) data: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from row-major cells. Returns `None` unless `cells.len() == size²`.
    pub fn from_cells(size: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == size * size).then_some(Self { size, data: cells })
    }

    /// Returns an immutable reference to the cell at `index`, or None if out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Converts a row-major index back to `(row, col)`.
    pub fn coords(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.data.len()).then(|| (index / self.size, index % self.size))
    }

    /// Orthogonal neighbours of `index`, in the order up, down, left, right.
    /// Out-of-range indices have no neighbours.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let Some((row, col)) = self.coords(index) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(4);
        if row > 0 {
            out.push(index - self.size);
        }
        if row + 1 < self.size {
            out.push(index + self.size);
        }
        if col > 0 {
            out.push(index - 1);
        }
        if col + 1 < self.size {
            out.push(index + 1);
        }
        out
    }

    /// Swaps two cells. Both indices must be in bounds.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
    }

    /// Iterates the cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

/// Grid of slots, each either holding a tile or empty.
pub type SlotGrid<B> = Grid<Option<Tile<B>>>;

/// Index at which the empty slot rests in the solved arrangement: the last cell.
///
/// This is a fixed convention of the solved-state definition and is independent of
/// which tile happens to be removed when a game is set up.
pub const fn canonical_empty_index(grid_size: usize) -> usize {
    (grid_size * grid_size).saturating_sub(1)
}
