//! Swap synthesis on a 2-D grid.
//!
//! A grid permutation is realised in three sorting phases: sort every column
//! by intermediate row, every row by final column, and every column by final
//! row. The intermediate rows come from a perfect-matching decomposition of
//! the column moves, which guarantees that after the first phase each row
//! holds exactly one qubit per final column. Each phase is an odd-even
//! transposition sort, so all swaps are between grid neighbours.

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{MapperError, MapperResult};
use crate::grid::matching::row_matchings;
use crate::mapping::{Mapping, Swap};
use crate::topology::{Grid, Topology};

/// Where the content of a cell has to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub final_row: u32,
    pub final_column: u32,
    /// Row the content visits between the column and row phases.
    pub intermediate_row: Option<u32>,
}

/// One cell of the grid and the destination of whatever sits there.
///
/// The current coordinates never change; sorting exchanges destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRecord {
    pub current_row: u32,
    pub current_column: u32,
    pub destination: Destination,
}

/// One record per cell, row-major, from the old and new mappings.
///
/// Qubits in both mappings move to their new cell. Remaining cells are
/// paired with unused destinations in row-major order.
pub fn position_records(grid: &Grid, old: &Mapping, new: &Mapping) -> Vec<PositionRecord> {
    let mut finals: Vec<Option<u32>> = vec![None; grid.num_qubits() as usize];
    for (logical, old_id) in old.iter() {
        if let (Some(new_id), Some(slot)) = (new.physical(logical), finals.get_mut(old_id as usize))
        {
            *slot = Some(new_id);
        }
    }
    let used: FxHashSet<u32> = finals.iter().flatten().copied().collect();
    let mut not_used = grid.positions().filter(|id| !used.contains(id));
    for slot in finals.iter_mut().filter(|slot| slot.is_none()) {
        *slot = not_used.next();
    }

    finals
        .into_iter()
        .enumerate()
        .map(|(cell, target)| {
            let (current_row, current_column) = grid.coordinates(cell as u32);
            let (final_row, final_column) = grid.coordinates(target.unwrap_or(cell as u32));
            PositionRecord {
                current_row,
                current_column,
                destination: Destination {
                    final_row,
                    final_column,
                    intermediate_row: None,
                },
            }
        })
        .collect()
}

/// Swaps realising the move described by `records`, using the row
/// matchings in the order given by `permutation`.
pub fn swaps_for_permutation(
    grid: &Grid,
    records: &[PositionRecord],
    matchings: &[Vec<u32>],
    permutation: &[usize],
) -> MapperResult<Vec<Swap>> {
    let mut records = records.to_vec();
    for column in 0..grid.num_columns() {
        for (row_after, &index) in permutation.iter().enumerate() {
            let destination_column = matchings
                .get(index)
                .and_then(|matching| matching.get(column as usize))
                .copied()
                .ok_or_else(|| {
                    MapperError::RowMatching(format!("missing matching {index}"))
                })?;
            let best = (0..grid.num_rows())
                .map(|row| grid.mapped_id(row, column) as usize)
                .filter(|&cell| {
                    let d = records[cell].destination;
                    d.intermediate_row.is_none() && d.final_column == destination_column
                })
                .min_by_key(|&cell| records[cell].destination.final_row)
                .ok_or_else(|| {
                    MapperError::RowMatching(format!(
                        "column {column} has no qubit left for column {destination_column}"
                    ))
                })?;
            records[best].destination.intermediate_row = Some(row_after as u32);
        }
    }

    let mut swaps = Vec::new();
    sort_columns(grid, &mut records, &mut swaps, |d| {
        d.intermediate_row.unwrap_or(u32::MAX)
    });
    sort_rows(grid, &mut records, &mut swaps, |d| d.final_column);
    sort_columns(grid, &mut records, &mut swaps, |d| d.final_row);
    Ok(swaps)
}

/// Cheapest swap sequence, under `cost`, that moves `old` into `new`.
///
/// All orders of the row matchings are tried when there are at most
/// `num_steps` of them; otherwise `num_steps` random orders are sampled.
/// The first order reaching the lowest cost wins.
pub fn optimal_swaps<F>(
    grid: &Grid,
    old: &Mapping,
    new: &Mapping,
    cost: &F,
    num_steps: usize,
    rng: &mut StdRng,
) -> MapperResult<Vec<Swap>>
where
    F: Fn(&[Swap]) -> usize + ?Sized,
{
    let records = position_records(grid, old, new);
    let final_columns: Vec<u32> = records
        .iter()
        .map(|r| r.destination.final_column)
        .collect();
    let matchings = row_matchings(grid, &final_columns)?;

    let rows = grid.num_rows() as usize;
    let num_steps = num_steps.max(1);
    let exhaustive = (1..=rows)
        .try_fold(1_usize, |acc, k| acc.checked_mul(k))
        .is_some_and(|count| count <= num_steps);
    let permutations: Vec<Vec<usize>> = if exhaustive {
        (0..rows).permutations(rows).collect()
    } else {
        (0..num_steps)
            .map(|_| {
                let mut permutation: Vec<usize> = (0..rows).collect();
                permutation.shuffle(rng);
                permutation
            })
            .collect()
    };
    debug!(
        candidates = permutations.len(),
        exhaustive, "searching row matching orders"
    );

    let mut best: Option<(usize, Vec<Swap>)> = None;
    for permutation in &permutations {
        let swaps = swaps_for_permutation(grid, &records, &matchings, permutation)?;
        let value = cost(&swaps);
        if best.as_ref().is_none_or(|(lowest, _)| value < *lowest) {
            best = Some((value, swaps));
        }
    }
    Ok(best.map(|(_, swaps)| swaps).unwrap_or_default())
}

fn sort_columns(
    grid: &Grid,
    records: &mut [PositionRecord],
    swaps: &mut Vec<Swap>,
    key: impl Fn(&Destination) -> u32,
) {
    for column in 0..grid.num_columns() {
        let cells: Vec<usize> = (0..grid.num_rows())
            .map(|row| grid.mapped_id(row, column) as usize)
            .collect();
        sort_line(&cells, records, swaps, &key);
    }
}

fn sort_rows(
    grid: &Grid,
    records: &mut [PositionRecord],
    swaps: &mut Vec<Swap>,
    key: impl Fn(&Destination) -> u32,
) {
    for row in 0..grid.num_rows() {
        let cells: Vec<usize> = (0..grid.num_columns())
            .map(|column| grid.mapped_id(row, column) as usize)
            .collect();
        sort_line(&cells, records, swaps, &key);
    }
}

/// Odd-even transposition sort of the destinations along one line of cells.
fn sort_line(
    cells: &[usize],
    records: &mut [PositionRecord],
    swaps: &mut Vec<Swap>,
    key: &impl Fn(&Destination) -> u32,
) {
    let mut finished = false;
    while !finished {
        finished = true;
        for first in [1, 0] {
            for i in (first..cells.len().saturating_sub(1)).step_by(2) {
                let (a, b) = (cells[i], cells[i + 1]);
                if key(&records[a].destination) > key(&records[b].destination) {
                    let moved = records[a].destination;
                    records[a].destination = records[b].destination;
                    records[b].destination = moved;
                    swaps.push((a as u32, b as u32));
                    finished = false;
                }
            }
        }
    }
}
