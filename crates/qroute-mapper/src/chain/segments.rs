//! Segment construction for a linear chain.
//!
//! Walks the buffered commands on a first come, first served basis and
//! collects the logical qubits that must sit next to each other so that as
//! many upcoming two-qubit gates as possible become nearest-neighbour gates
//! without further swaps.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use qroute_ir::QubitId;

use crate::buffer::{BufferedCommand, CommandShape};

/// Result of a segment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// Ordered runs of logical qubits required to be contiguous.
    pub segments: Vec<Vec<QubitId>>,
    /// Logical qubits that need a slot in the new mapping.
    pub allocated: BTreeSet<QubitId>,
}

/// Scratch state of one segment pass. Built fresh per round and dropped at
/// the end of it.
struct RoundState {
    num_qubits: usize,
    cyclic: bool,
    /// Qubits holding a slot. A qubit deallocated during the round keeps its
    /// slot so a second qubit cannot alias it before the next swaps.
    allocated: BTreeSet<QubitId>,
    /// Qubits whose future gates can still shape the mapping.
    active: FxHashSet<QubitId>,
    segments: Vec<Vec<QubitId>>,
    neighbours: FxHashMap<QubitId, FxHashSet<QubitId>>,
}

/// Build the segments for the next mapping of a chain of `num_qubits`.
///
/// `allocated` holds the logical qubits already placed on hardware; they
/// start out active and must appear in the new mapping.
pub fn build_segments(
    num_qubits: u32,
    cyclic: bool,
    allocated: &BTreeSet<QubitId>,
    commands: &[BufferedCommand],
) -> Segments {
    let state = RoundState::run(num_qubits, cyclic, allocated, commands);
    Segments {
        segments: state.segments,
        allocated: state.allocated,
    }
}

impl RoundState {
    fn run(
        num_qubits: u32,
        cyclic: bool,
        allocated: &BTreeSet<QubitId>,
        commands: &[BufferedCommand],
    ) -> Self {
        let mut state = Self {
            num_qubits: num_qubits as usize,
            cyclic,
            allocated: allocated.clone(),
            active: allocated.iter().copied().collect(),
            segments: Vec::new(),
            neighbours: allocated
                .iter()
                .map(|&q| (q, FxHashSet::default()))
                .collect(),
        };

        for buffered in commands {
            if state.allocated.len() == state.num_qubits && state.active.is_empty() {
                break;
            }
            match buffered.shape {
                CommandShape::Allocate(q) => state.allocate(q),
                CommandShape::Deallocate(q) => {
                    state.active.remove(&q);
                }
                CommandShape::Single(_) => {}
                CommandShape::Pair(a, b) => state.process_two_qubit_gate(a, b),
            }
        }
        state
    }

    fn allocate(&mut self, qubit: QubitId) {
        if self.allocated.len() < self.num_qubits {
            self.allocated.insert(qubit);
            self.active.insert(qubit);
            self.neighbours.insert(qubit, FxHashSet::default());
        }
    }

    fn deactivate(&mut self, a: QubitId, b: QubitId) {
        self.active.remove(&a);
        self.active.remove(&b);
    }

    fn degree(&self, qubit: QubitId) -> usize {
        self.neighbours.get(&qubit).map_or(0, FxHashSet::len)
    }

    fn link(&mut self, a: QubitId, b: QubitId) {
        self.neighbours.entry(a).or_default().insert(b);
        self.neighbours.entry(b).or_default().insert(a);
    }

    /// Index of the segment `qubit` terminates, and whether it is the left end.
    fn segment_end(&self, qubit: QubitId) -> Option<(usize, bool)> {
        self.segments.iter().enumerate().find_map(|(index, segment)| {
            if segment.first() == Some(&qubit) {
                Some((index, true))
            } else if segment.last() == Some(&qubit) {
                Some((index, false))
            } else {
                None
            }
        })
    }

    /// Close a segment spanning the whole ring.
    fn close_ring(&mut self, index: usize) {
        if !self.cyclic {
            return;
        }
        let ends = match self.segments.get(index) {
            Some(segment) if segment.len() == self.num_qubits => {
                segment.first().copied().zip(segment.last().copied())
            }
            _ => None,
        };
        if let Some((first, last)) = ends {
            self.link(first, last);
        }
    }

    /// Append segment `drop` (optionally reversed) to segment `keep` and
    /// remove it. Returns the index of the merged segment.
    fn merge(&mut self, keep: usize, drop: usize, reverse_drop: bool) -> usize {
        let mut tail = std::mem::take(&mut self.segments[drop]);
        if reverse_drop {
            tail.reverse();
        }
        self.segments[keep].extend(tail);
        self.segments.remove(drop);
        if keep > drop { keep - 1 } else { keep }
    }

    fn process_two_qubit_gate(&mut self, a: QubitId, b: QubitId) {
        // Already connected.
        if self.neighbours.get(&b).is_some_and(|n| n.contains(&a)) {
            return;
        }
        if !self.active.contains(&a) || !self.active.contains(&b) {
            self.deactivate(a, b);
            return;
        }
        // A qubit inside a segment has no room for a third neighbour.
        if self.degree(a) > 1 || self.degree(b) > 1 {
            self.deactivate(a, b);
            return;
        }

        let merged = match (self.segment_end(a), self.segment_end(b)) {
            (None, None) => {
                self.segments.push(vec![a, b]);
                self.segments.len() - 1
            }
            // Joining the two ends of one segment needs a ring; a closed
            // ring was already caught as connected above.
            (Some((ia, _)), Some((ib, _))) if ia == ib => {
                self.deactivate(a, b);
                return;
            }
            (None, Some((ib, b_left))) => {
                if b_left {
                    self.segments[ib].insert(0, a);
                } else {
                    self.segments[ib].push(a);
                }
                ib
            }
            (Some((ia, a_left)), None) => {
                if a_left {
                    self.segments[ia].insert(0, b);
                } else {
                    self.segments[ia].push(b);
                }
                ia
            }
            (Some((ia, a_left)), Some((ib, b_left))) => match (a_left, b_left) {
                (false, true) => self.merge(ia, ib, false),
                (false, false) => self.merge(ia, ib, true),
                (true, true) => {
                    self.segments[ia].reverse();
                    self.merge(ia, ib, false)
                }
                (true, false) => self.merge(ib, ia, false),
            },
        };

        self.link(a, b);
        self.close_ring(merged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_ir::{Command, StandardGate};

    fn buffered(commands: Vec<Command>) -> Vec<BufferedCommand> {
        commands
            .into_iter()
            .map(|c| BufferedCommand::classify(c).unwrap())
            .collect()
    }

    fn cx(a: u32, b: u32) -> Command {
        Command::gate(StandardGate::CX, [QubitId(a), QubitId(b)])
    }

    fn ids(raw: &[u32]) -> Vec<QubitId> {
        raw.iter().copied().map(QubitId).collect()
    }

    fn allocated(raw: &[u32]) -> BTreeSet<QubitId> {
        raw.iter().copied().map(QubitId).collect()
    }

    #[test]
    fn test_new_segment_absorbs_third_qubit() {
        let cmds = buffered(vec![
            Command::allocate(QubitId(0)),
            Command::allocate(QubitId(1)),
            Command::allocate(QubitId(2)),
            Command::controlled(StandardGate::X, [QubitId(1)], [QubitId(0)]),
            Command::controlled(StandardGate::X, [QubitId(1)], [QubitId(2)]),
            Command::gate(StandardGate::H, [QubitId(0)]),
        ]);
        let result = build_segments(3, false, &BTreeSet::new(), &cmds);
        assert_eq!(result.segments, vec![ids(&[2, 1, 0])]);
        assert_eq!(result.allocated, allocated(&[0, 1, 2]));
    }

    #[test]
    fn test_merge_right_to_left() {
        let cmds = buffered(vec![cx(0, 1), cx(2, 3), cx(1, 2)]);
        let result = build_segments(4, false, &allocated(&[0, 1, 2, 3]), &cmds);
        assert_eq!(result.segments, vec![ids(&[0, 1, 2, 3])]);
    }

    #[test]
    fn test_merge_right_to_right_reverses() {
        let cmds = buffered(vec![cx(0, 1), cx(2, 3), cx(1, 3)]);
        let result = build_segments(4, false, &allocated(&[0, 1, 2, 3]), &cmds);
        assert_eq!(result.segments, vec![ids(&[0, 1, 3, 2])]);
    }

    #[test]
    fn test_merge_left_to_left_reverses() {
        let cmds = buffered(vec![cx(0, 1), cx(2, 3), cx(0, 2)]);
        let result = build_segments(4, false, &allocated(&[0, 1, 2, 3]), &cmds);
        assert_eq!(result.segments, vec![ids(&[1, 0, 2, 3])]);
    }

    #[test]
    fn test_merge_left_to_right() {
        let cmds = buffered(vec![cx(0, 1), cx(2, 3), cx(0, 3)]);
        let result = build_segments(4, false, &allocated(&[0, 1, 2, 3]), &cmds);
        assert_eq!(result.segments, vec![ids(&[2, 3, 0, 1])]);
    }

    #[test]
    fn test_interior_qubit_deactivates_pair() {
        // 1 is inside [0, 1, 2]; the gate on (1, 3) is impossible and 3 must
        // not grow any segment afterwards.
        let cmds = buffered(vec![cx(0, 1), cx(1, 2), cx(1, 3), cx(3, 4)]);
        let result = build_segments(5, false, &allocated(&[0, 1, 2, 3, 4]), &cmds);
        assert_eq!(result.segments, vec![ids(&[0, 1, 2])]);
    }

    #[test]
    fn test_same_segment_conflict() {
        let cmds = buffered(vec![cx(0, 1), cx(1, 2), cx(0, 2), cx(2, 3)]);
        let result = build_segments(4, false, &allocated(&[0, 1, 2, 3]), &cmds);
        assert_eq!(result.segments, vec![ids(&[0, 1, 2])]);
    }

    #[test]
    fn test_cyclic_closes_ring() {
        let cmds = buffered(vec![cx(0, 1), cx(1, 2), cx(2, 3), cx(0, 3)]);
        let all = allocated(&[0, 1, 2, 3]);

        let ring = RoundState::run(4, true, &all, &cmds);
        assert_eq!(ring.segments, vec![ids(&[0, 1, 2, 3])]);
        assert!(ring.neighbours[&QubitId(0)].contains(&QubitId(3)));
        // The wrap edge makes (0, 3) a satisfied gate.
        assert_eq!(ring.active.len(), 4);

        let open = RoundState::run(4, false, &all, &cmds);
        assert_eq!(open.segments, vec![ids(&[0, 1, 2, 3])]);
        assert!(!open.active.contains(&QubitId(0)));
        assert!(!open.active.contains(&QubitId(3)));
    }

    #[test]
    fn test_ring_only_closes_at_full_length() {
        let cmds = buffered(vec![cx(0, 1), cx(1, 2)]);
        let ring = RoundState::run(4, true, &allocated(&[0, 1, 2, 3]), &cmds);
        assert!(!ring.neighbours[&QubitId(0)].contains(&QubitId(2)));
    }

    #[test]
    fn test_stops_when_nothing_is_active() {
        let cmds = buffered(vec![
            Command::deallocate(QubitId(0)),
            Command::deallocate(QubitId(1)),
            Command::allocate(QubitId(5)),
        ]);
        let state = RoundState::run(2, false, &allocated(&[0, 1]), &cmds);
        assert!(state.active.is_empty());
        assert!(!state.allocated.contains(&QubitId(5)));
    }

    #[test]
    fn test_deallocate_keeps_slot() {
        let cmds = buffered(vec![
            Command::allocate(QubitId(0)),
            Command::deallocate(QubitId(0)),
            Command::allocate(QubitId(1)),
            Command::allocate(QubitId(2)),
        ]);
        let result = build_segments(2, false, &BTreeSet::new(), &cmds);
        // Slot of qubit 0 is not reused during this round.
        assert_eq!(result.allocated, allocated(&[0, 1]));
    }

    #[test]
    fn test_inactive_qubit_blocks_partner() {
        let cmds = buffered(vec![
            Command::allocate(QubitId(0)),
            Command::allocate(QubitId(1)),
            Command::allocate(QubitId(2)),
            cx(0, 2),
            cx(0, 1),
        ]);
        // Only two slots: qubit 2 gets none, so the gate (0, 2) deactivates 0.
        let result = build_segments(2, false, &BTreeSet::new(), &cmds);
        assert!(result.segments.is_empty());
        assert_eq!(result.allocated, allocated(&[0, 1]));
    }
}
