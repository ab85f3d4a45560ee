//! Remap statistics.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::mapping::Swap;

/// Circuit depth needed to execute `swaps`.
///
/// This is the length of the longest chain of swaps that share a physical
/// qubit, i.e. the number of layers if independent swaps run in parallel.
pub fn swap_depth(swaps: &[Swap]) -> usize {
    let mut depth_of_qubits: FxHashMap<u32, usize> = FxHashMap::default();
    let mut max_depth = 0;
    for &(a, b) in swaps {
        let depth = depth_of_qubits
            .get(&a)
            .copied()
            .unwrap_or(0)
            .max(depth_of_qubits.get(&b).copied().unwrap_or(0))
            + 1;
        depth_of_qubits.insert(a, depth);
        depth_of_qubits.insert(b, depth);
        max_depth = max_depth.max(depth);
    }
    max_depth
}

/// Counters collected over the lifetime of a mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingStatistics {
    /// Number of times the mapping was changed by a non-empty swap list.
    pub num_mappings: usize,
    /// Key: swap depth of a remap. Value: number of such remaps.
    pub depth_of_swaps: BTreeMap<usize, usize>,
    /// Key: number of swaps in a remap. Value: number of such remaps.
    pub num_of_swaps_per_mapping: BTreeMap<usize, usize>,
}

impl MappingStatistics {
    /// Record one remap that used `swaps`.
    pub fn record(&mut self, swaps: &[Swap]) {
        self.num_mappings += 1;
        *self.depth_of_swaps.entry(swap_depth(swaps)).or_default() += 1;
        *self.num_of_swaps_per_mapping.entry(swaps.len()).or_default() += 1;
    }

    /// Total number of swaps emitted so far.
    pub fn total_swaps(&self) -> usize {
        self.num_of_swaps_per_mapping
            .iter()
            .map(|(len, count)| len * count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_depth() {
        assert_eq!(swap_depth(&[]), 0);
        assert_eq!(swap_depth(&[(0, 1), (2, 3)]), 1);
        assert_eq!(swap_depth(&[(0, 1), (1, 2), (2, 3)]), 3);
        assert_eq!(swap_depth(&[(0, 1), (2, 3), (1, 2)]), 2);
    }

    #[test]
    fn test_record() {
        let mut stats = MappingStatistics::default();
        stats.record(&[(0, 1), (2, 3)]);
        stats.record(&[(0, 1), (1, 2)]);
        stats.record(&[(4, 5), (6, 7)]);
        assert_eq!(stats.num_mappings, 3);
        assert_eq!(stats.depth_of_swaps.get(&1), Some(&2));
        assert_eq!(stats.depth_of_swaps.get(&2), Some(&1));
        assert_eq!(stats.num_of_swaps_per_mapping.get(&2), Some(&3));
        assert_eq!(stats.total_swaps(), 6);
    }
}
