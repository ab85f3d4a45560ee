//! Physical qubit topologies.
//!
//! A topology numbers its physical positions `0..num_qubits()` and decides
//! which pairs of positions may take part in a two-qubit gate. The segment
//! builder and the dispatcher both ask the topology, so adjacency is defined
//! in exactly one place per topology.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Connectivity of a fixed set of physical qubits.
pub trait Topology {
    /// Number of physical positions.
    fn num_qubits(&self) -> u32;

    /// Check if two physical positions are nearest neighbours.
    fn are_adjacent(&self, a: u32, b: u32) -> bool;

    /// All physical positions.
    fn positions(&self) -> Range<u32> {
        0..self.num_qubits()
    }
}

/// A 1-D chain of qubits, optionally closed into a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    num_qubits: u32,
    cyclic: bool,
}

impl Chain {
    /// Create an open chain `0 - 1 - ... - n-1`.
    pub fn open(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            cyclic: false,
        }
    }

    /// Create a ring where `n-1` also neighbours `0`.
    pub fn cyclic(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            cyclic: true,
        }
    }

    /// Create a chain with the given boundary condition.
    pub fn new(num_qubits: u32, cyclic: bool) -> Self {
        Self { num_qubits, cyclic }
    }

    /// Check if the chain wraps around.
    #[inline]
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

impl Topology for Chain {
    #[inline]
    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn are_adjacent(&self, a: u32, b: u32) -> bool {
        let diff = a.abs_diff(b);
        diff == 1 || (self.cyclic && self.num_qubits > 1 && diff == self.num_qubits - 1)
    }
}

/// A 2-D square grid, numbered in row-major order.
///
/// For 3 rows and 2 columns:
///
/// ```text
/// 0 - 1
/// |   |
/// 2 - 3
/// |   |
/// 4 - 5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    num_rows: u32,
    num_columns: u32,
}

impl Grid {
    /// Create a grid with the given shape.
    pub fn new(num_rows: u32, num_columns: u32) -> Self {
        Self {
            num_rows,
            num_columns,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> u32 {
        self.num_rows
    }

    /// Number of columns.
    #[inline]
    pub fn num_columns(&self) -> u32 {
        self.num_columns
    }

    /// `(row, column)` of a row-major mapped id.
    #[inline]
    pub fn coordinates(&self, mapped_id: u32) -> (u32, u32) {
        (mapped_id / self.num_columns, mapped_id % self.num_columns)
    }

    /// Row-major mapped id of `(row, column)`.
    #[inline]
    pub fn mapped_id(&self, row: u32, column: u32) -> u32 {
        row * self.num_columns + column
    }
}

impl Topology for Grid {
    #[inline]
    fn num_qubits(&self) -> u32 {
        self.num_rows * self.num_columns
    }

    fn are_adjacent(&self, a: u32, b: u32) -> bool {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        hi - lo == self.num_columns || (hi - lo == 1 && hi % self.num_columns != 0)
    }
}
