//! Logical-to-physical qubit mapping.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use qroute_ir::QubitId;

/// Exchange of two physical qubits.
pub type Swap = (u32, u32);

/// A bijection from logical qubits to physical positions.
///
/// Both directions are stored so the physical chain can be read back
/// without a scan. Values are pairwise distinct at all times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Map from logical qubit to physical position.
    logical_to_physical: FxHashMap<QubitId, u32>,
    /// Map from physical position to logical qubit.
    physical_to_logical: FxHashMap<u32, QubitId>,
}

impl Mapping {
    /// Create a new empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from `(logical, physical)` pairs.
    ///
    /// Later pairs override earlier ones that share either side.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (QubitId, u32)>) -> Self {
        let mut mapping = Self::new();
        for (logical, physical) in pairs {
            mapping.insert(logical, physical);
        }
        mapping
    }

    /// Map a logical qubit to a physical position.
    ///
    /// If the physical position already hosts a different logical qubit,
    /// that entry is removed first, and likewise for a previous position of
    /// this logical qubit, so both directions stay consistent.
    pub fn insert(&mut self, logical: QubitId, physical: u32) {
        if let Some(&old_logical) = self.physical_to_logical.get(&physical) {
            if old_logical != logical {
                self.logical_to_physical.remove(&old_logical);
            }
        }
        if let Some(&old_physical) = self.logical_to_physical.get(&logical) {
            if old_physical != physical {
                self.physical_to_logical.remove(&old_physical);
            }
        }
        self.logical_to_physical.insert(logical, physical);
        self.physical_to_logical.insert(physical, logical);
    }

    /// Remove a logical qubit, returning its former position.
    pub fn remove(&mut self, logical: QubitId) -> Option<u32> {
        let physical = self.logical_to_physical.remove(&logical)?;
        self.physical_to_logical.remove(&physical);
        Some(physical)
    }

    /// Get the physical position of a logical qubit.
    #[inline]
    pub fn physical(&self, logical: QubitId) -> Option<u32> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Get the logical qubit at a physical position.
    #[inline]
    pub fn logical(&self, physical: u32) -> Option<QubitId> {
        self.physical_to_logical.get(&physical).copied()
    }

    /// Check if a logical qubit is mapped.
    #[inline]
    pub fn contains(&self, logical: QubitId) -> bool {
        self.logical_to_physical.contains_key(&logical)
    }

    /// Exchange the contents of two physical positions.
    pub fn swap(&mut self, p1: u32, p2: u32) {
        let l1 = self.physical_to_logical.remove(&p1);
        let l2 = self.physical_to_logical.remove(&p2);

        if let Some(l1) = l1 {
            self.logical_to_physical.insert(l1, p2);
            self.physical_to_logical.insert(p2, l1);
        }
        if let Some(l2) = l2 {
            self.logical_to_physical.insert(l2, p1);
            self.physical_to_logical.insert(p1, l2);
        }
    }

    /// Apply a sequence of swaps in order.
    pub fn apply_swaps(&mut self, swaps: &[Swap]) {
        for &(a, b) in swaps {
            self.swap(a, b);
        }
    }

    /// Get the number of mapped qubits.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Check if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }

    /// Iterate over `(logical, physical)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, u32)> + '_ {
        self.logical_to_physical.iter().map(|(&l, &p)| (l, p))
    }

    /// Iterate over mapped logical qubits in arbitrary order.
    pub fn logical_ids(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.logical_to_physical.keys().copied()
    }

    /// Position-indexed view: `chain[p]` is the logical qubit at `p`.
    ///
    /// Positions outside `0..num_qubits` are ignored.
    pub fn to_chain(&self, num_qubits: u32) -> Vec<Option<QubitId>> {
        let mut chain = vec![None; num_qubits as usize];
        for (&physical, &logical) in &self.physical_to_logical {
            if let Some(slot) = chain.get_mut(physical as usize) {
                *slot = Some(logical);
            }
        }
        chain
    }

    /// Rewrite every physical position through `f`.
    #[must_use]
    pub fn translate(&self, mut f: impl FnMut(u32) -> u32) -> Self {
        Self::from_pairs(self.iter().map(|(l, p)| (l, f(p))))
    }

    /// Sorted copy for display and comparison.
    pub fn to_btree(&self) -> BTreeMap<QubitId, u32> {
        self.iter().collect()
    }

    /// Check that every position lies in `0..num_qubits`.
    ///
    /// Distinctness holds by construction.
    pub fn is_within(&self, num_qubits: u32) -> bool {
        self.physical_to_logical.len() == self.logical_to_physical.len()
            && self.physical_to_logical.keys().all(|&p| p < num_qubits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_bijection() {
        let mut mapping = Mapping::new();
        mapping.insert(QubitId(0), 3);
        mapping.insert(QubitId(1), 3);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.logical(3), Some(QubitId(1)));
        assert_eq!(mapping.physical(QubitId(0)), None);

        mapping.insert(QubitId(1), 4);
        assert_eq!(mapping.logical(3), None);
        assert_eq!(mapping.physical(QubitId(1)), Some(4));
    }

    #[test]
    fn test_swap_with_empty_position() {
        let mut mapping = Mapping::from_pairs([(QubitId(0), 0), (QubitId(1), 1)]);
        mapping.swap(1, 2);
        assert_eq!(mapping.physical(QubitId(1)), Some(2));
        assert_eq!(mapping.logical(1), None);
        mapping.apply_swaps(&[(0, 1), (1, 2)]);
        assert_eq!(mapping.physical(QubitId(0)), Some(2));
        assert_eq!(mapping.physical(QubitId(1)), Some(1));
    }

    #[test]
    fn test_chain_view() {
        let mapping = Mapping::from_pairs([(QubitId(7), 2), (QubitId(9), 0)]);
        assert_eq!(
            mapping.to_chain(4),
            vec![Some(QubitId(9)), None, Some(QubitId(7)), None]
        );
        assert!(mapping.is_within(3));
        assert!(!mapping.is_within(2));
    }

    #[test]
    fn test_remove() {
        let mut mapping = Mapping::from_pairs([(QubitId(0), 5)]);
        assert_eq!(mapping.remove(QubitId(0)), Some(5));
        assert_eq!(mapping.remove(QubitId(0)), None);
        assert!(mapping.is_empty());
    }
}
