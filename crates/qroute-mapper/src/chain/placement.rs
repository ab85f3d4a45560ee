//! Placement of segments onto the chain.
//!
//! Segments are laid out left to right. Each step picks the segment and
//! padding whose target window agrees most with where the qubits sat in the
//! previous mapping. This is not globally optimal, but it keeps independent
//! groups of qubits roughly in place and so saves swaps.

use rustc_hash::FxHashSet;

use qroute_ir::QubitId;

use crate::chain::segments::Segments;
use crate::mapping::Mapping;

/// Combine segments into a new mapping on a chain of `num_qubits`.
///
/// Every qubit in `segments.allocated` receives a position; qubits that are
/// in no segment are placed as segments of length one.
pub fn place_segments(num_qubits: u32, segments: &Segments, current: &Mapping) -> Mapping {
    let n = num_qubits as usize;
    let in_segment: FxHashSet<QubitId> = segments.segments.iter().flatten().copied().collect();

    let mut remaining = segments.segments.clone();
    remaining.extend(
        segments
            .allocated
            .iter()
            .filter(|q| !in_segment.contains(q))
            .map(|&q| vec![q]),
    );

    let previous_chain = current.to_chain(num_qubits);
    let mut new_chain: Vec<Option<QubitId>> = vec![None; n];
    let mut num_unused = n.saturating_sub(segments.allocated.len());
    let mut position_to_fill = 0;

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_padding = n;
        let mut highest_fraction = 0.0_f64;

        for (index, segment) in remaining.iter().enumerate() {
            for padding in 0..=num_unused {
                let start = position_to_fill + padding;
                let overlap = overlap(&previous_chain, start, segment);
                let perfect = overlap == segment.len();
                let fraction = overlap as f64 / segment.len() as f64;
                if (perfect && padding < best_padding)
                    || fraction > highest_fraction
                    || highest_fraction <= 0.0
                {
                    best_index = index;
                    best_padding = padding;
                    highest_fraction = fraction;
                }
            }
        }

        let segment = remaining.remove(best_index);
        let start = position_to_fill + best_padding;
        for (slot, &qubit) in new_chain.iter_mut().skip(start).zip(&segment) {
            *slot = Some(qubit);
        }
        position_to_fill = start + segment.len();
        num_unused -= best_padding.min(num_unused);
    }

    Mapping::from_pairs(
        new_chain
            .iter()
            .enumerate()
            .filter_map(|(position, q)| q.map(|q| (q, position as u32))),
    )
}

/// Number of positions in `chain[start..start + segment.len()]` that are
/// either unknown or hold a qubit of `segment`.
fn overlap(chain: &[Option<QubitId>], start: usize, segment: &[QubitId]) -> usize {
    let end = (start + segment.len()).min(chain.len());
    let window = chain.get(start..end).unwrap_or_default();
    let unknown = window.iter().filter(|q| q.is_none()).count();
    let shared: FxHashSet<QubitId> = window
        .iter()
        .flatten()
        .filter(|q| segment.contains(q))
        .copied()
        .collect();
    shared.len() + unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn segments(runs: &[&[u32]], allocated: &[u32]) -> Segments {
        Segments {
            segments: runs
                .iter()
                .map(|run| run.iter().copied().map(QubitId).collect())
                .collect(),
            allocated: allocated.iter().copied().map(QubitId).collect::<BTreeSet<_>>(),
        }
    }

    fn mapping(pairs: &[(u32, u32)]) -> Mapping {
        Mapping::from_pairs(pairs.iter().map(|&(l, p)| (QubitId(l), p)))
    }

    #[test]
    fn test_first_placement_fills_from_left() {
        let result = place_segments(3, &segments(&[&[2, 1, 0]], &[0, 1, 2]), &Mapping::new());
        assert_eq!(result, mapping(&[(2, 0), (1, 1), (0, 2)]));
    }

    #[test]
    fn test_keeps_qubits_in_place() {
        let current = mapping(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
        let result = place_segments(
            6,
            &segments(&[&[4, 5], &[0, 1]], &[0, 1, 2, 3, 4, 5]),
            &current,
        );
        assert_eq!(result, current);
    }

    #[test]
    fn test_unknown_positions_count_as_overlap() {
        // Qubit 7 sits on 0 and 0 on 2; position 1 was empty, so qubit 0
        // moves into the gap right after 7.
        let current = mapping(&[(7, 0), (0, 2)]);
        let result = place_segments(4, &segments(&[], &[0, 7]), &current);
        assert_eq!(result, mapping(&[(7, 0), (0, 1)]));
    }

    #[test]
    fn test_every_allocated_qubit_is_placed() {
        let result = place_segments(5, &segments(&[&[3, 1]], &[1, 2, 3]), &Mapping::new());
        assert_eq!(result.len(), 3);
        assert!(result.is_within(5));
        let p3 = result.physical(QubitId(3)).unwrap();
        let p1 = result.physical(QubitId(1)).unwrap();
        assert_eq!(p3.abs_diff(p1), 1);
    }

    #[test]
    fn test_overlap_counts() {
        let chain = vec![Some(QubitId(1)), None, Some(QubitId(2))];
        assert_eq!(overlap(&chain, 0, &[QubitId(1), QubitId(5)]), 2);
        assert_eq!(overlap(&chain, 1, &[QubitId(1), QubitId(5)]), 1);
        assert_eq!(overlap(&chain, 0, &[QubitId(9)]), 0);
    }
}
