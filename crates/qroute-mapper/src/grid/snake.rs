//! Snake ordering of a grid.
//!
//! Even rows run left to right, odd rows right to left, so consecutive
//! chain indices are always grid neighbours:
//!
//! ```text
//! 0 - 1 - 2
//!         |
//! 5 - 4 - 3
//! |
//! 6 - 7 - 8
//! ```

use crate::topology::Grid;

/// Bijection between row-major mapped ids and snake chain indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snake {
    grid: Grid,
}

impl Snake {
    /// Create the snake ordering of `grid`.
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Row-major mapped id of a chain index.
    pub fn grid_id(&self, index: u32) -> u32 {
        let columns = self.grid.num_columns();
        let row = index / columns;
        if row % 2 == 0 {
            index
        } else {
            row * columns + (columns - 1 - index % columns)
        }
    }

    /// Chain index of a row-major mapped id.
    pub fn chain_index(&self, mapped_id: u32) -> u32 {
        let (row, column) = self.grid.coordinates(mapped_id);
        if row % 2 == 0 {
            mapped_id
        } else {
            let columns = self.grid.num_columns();
            row * columns + (columns - 1 - column)
        }
    }
}
