//! Swap synthesis on a chain via odd-even transposition sort.
//!
//! See <https://en.wikipedia.org/wiki/Odd%E2%80%93even_sort>. The sorting
//! network only ever compares neighbouring positions, so every emitted swap
//! is nearest-neighbour, and it finishes after at most `n` passes.

use rustc_hash::FxHashSet;

use crate::mapping::{Mapping, Swap};

/// Swaps that move every qubit shared by `old` and `new` from its old to its
/// new position on a chain of `num_qubits`.
///
/// Positions not covered by a shared qubit are paired with the unused target
/// positions in ascending order.
pub fn odd_even_transposition_swaps(num_qubits: u32, old: &Mapping, new: &Mapping) -> Vec<Swap> {
    let n = num_qubits as usize;
    let mut final_positions: Vec<Option<u32>> = vec![None; n];
    for (logical, old_position) in old.iter() {
        if let (Some(new_position), Some(slot)) = (
            new.physical(logical),
            final_positions.get_mut(old_position as usize),
        ) {
            *slot = Some(new_position);
        }
    }

    let used: FxHashSet<u32> = final_positions.iter().flatten().copied().collect();
    let mut not_used = (0..num_qubits).filter(|p| !used.contains(p));
    for slot in final_positions.iter_mut().filter(|slot| slot.is_none()) {
        *slot = not_used.next();
    }
    let mut keys: Vec<u32> = final_positions.into_iter().flatten().collect();

    let mut swaps = Vec::new();
    let mut finished = false;
    while !finished {
        finished = true;
        for first in [1, 0] {
            for i in (first..keys.len().saturating_sub(1)).step_by(2) {
                if keys[i] > keys[i + 1] {
                    keys.swap(i, i + 1);
                    swaps.push((i as u32, i as u32 + 1));
                    finished = false;
                }
            }
        }
    }
    swaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_ir::QubitId;

    fn mapping(pairs: &[(u32, u32)]) -> Mapping {
        Mapping::from_pairs(pairs.iter().map(|&(l, p)| (QubitId(l), p)))
    }

    #[test]
    fn test_full_reversal() {
        let old = mapping(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
        let new = mapping(&[(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]);
        let swaps = odd_even_transposition_swaps(5, &old, &new);

        assert!(swaps.iter().all(|&(a, b)| b == a + 1));
        let mut chain = old.clone();
        chain.apply_swaps(&swaps);
        assert_eq!(chain, new);
        // Reversal of 5 elements needs every inversion undone once.
        assert_eq!(swaps.len(), 10);
    }

    #[test]
    fn test_identity_needs_no_swaps() {
        let old = mapping(&[(0, 0), (1, 1), (2, 2)]);
        assert!(odd_even_transposition_swaps(3, &old, &old).is_empty());
        assert!(odd_even_transposition_swaps(3, &Mapping::new(), &old).is_empty());
    }

    #[test]
    fn test_partial_mappings() {
        // Qubit 1 disappears, qubit 2 is new; only qubit 0 has to move.
        let old = mapping(&[(0, 0), (1, 3)]);
        let new = mapping(&[(0, 2), (2, 0)]);
        let swaps = odd_even_transposition_swaps(4, &old, &new);

        let mut moved = old.clone();
        moved.apply_swaps(&swaps);
        assert_eq!(moved.physical(QubitId(0)), Some(2));
    }

    #[test]
    fn test_single_qubit_chain() {
        let old = mapping(&[(0, 0)]);
        assert!(odd_even_transposition_swaps(1, &old, &old).is_empty());
    }
}
