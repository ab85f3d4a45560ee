//! Decomposition of column moves into perfect matchings.
//!
//! Count, for every pair of columns `(c, d)`, the qubits that sit in column
//! `c` and must end in column `d`. Seen as a bipartite multigraph this is
//! `num_rows`-regular, so it splits into `num_rows` perfect matchings. Each
//! matching becomes one intermediate row.

use petgraph::algo::maximum_matching;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{MapperError, MapperResult};
use crate::topology::Grid;

/// Split the column moves of a grid into `num_rows` perfect matchings.
///
/// `final_columns[i]` is the column the qubit at row-major cell `i` must
/// reach. Entry `c` of a returned matching is the destination column paired
/// with source column `c`.
pub fn row_matchings(grid: &Grid, final_columns: &[u32]) -> MapperResult<Vec<Vec<u32>>> {
    let columns = grid.num_columns() as usize;
    let mut counts = vec![vec![0_usize; columns]; columns];
    for (cell, &destination) in final_columns.iter().enumerate() {
        let (_, column) = grid.coordinates(cell as u32);
        let slot = counts
            .get_mut(column as usize)
            .and_then(|row| row.get_mut(destination as usize))
            .ok_or_else(|| {
                MapperError::RowMatching(format!(
                    "destination column {destination} is outside the grid"
                ))
            })?;
        *slot += 1;
    }

    let mut matchings = Vec::with_capacity(grid.num_rows() as usize);
    for round in 0..grid.num_rows() {
        let mut graph = UnGraph::<(), ()>::with_capacity(2 * columns, columns * columns);
        for _ in 0..2 * columns {
            graph.add_node(());
        }
        for (source, row) in counts.iter().enumerate() {
            for (destination, &count) in row.iter().enumerate() {
                if count > 0 {
                    graph.add_edge(
                        NodeIndex::new(source),
                        NodeIndex::new(columns + destination),
                        (),
                    );
                }
            }
        }

        let matching = maximum_matching(&graph);
        let mut destinations = Vec::with_capacity(columns);
        for source in 0..columns {
            let mate = matching
                .mate(NodeIndex::new(source))
                .map(|node| node.index())
                .filter(|&node| node >= columns)
                .ok_or_else(|| {
                    MapperError::RowMatching(format!(
                        "no perfect matching for intermediate row {round}"
                    ))
                })?;
            let destination = mate - columns;
            counts[source][destination] -= 1;
            destinations.push(destination as u32);
        }
        matchings.push(destinations);
    }
    Ok(matchings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_columns() {
        let grid = Grid::new(2, 3);
        let matchings = row_matchings(&grid, &[0, 1, 2, 0, 1, 2]).unwrap();
        assert_eq!(matchings, vec![vec![0, 1, 2], vec![0, 1, 2]]);
    }

    #[test]
    fn test_matchings_cover_every_move() {
        let grid = Grid::new(3, 3);
        // Column 0 sends to {2, 1, 0}, column 1 to {0, 0, 2}, column 2 to {1, 2, 1}.
        let finals = [2, 0, 1, 1, 0, 2, 0, 2, 1];
        let matchings = row_matchings(&grid, &finals).unwrap();
        assert_eq!(matchings.len(), 3);

        let mut expected = vec![vec![0; 3]; 3];
        for (cell, &d) in finals.iter().enumerate() {
            expected[cell % 3][d as usize] += 1;
        }
        let mut seen = vec![vec![0; 3]; 3];
        for matching in &matchings {
            let mut targets = matching.clone();
            targets.sort_unstable();
            assert_eq!(targets, vec![0, 1, 2]);
            for (source, &d) in matching.iter().enumerate() {
                seen[source][d as usize] += 1;
            }
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_rejects_irregular_moves() {
        let grid = Grid::new(2, 2);
        // Both qubits of column 0 and column 1 want column 0.
        assert!(matches!(
            row_matchings(&grid, &[0, 0, 0, 0]),
            Err(MapperError::RowMatching(_))
        ));
        assert!(row_matchings(&grid, &[0, 5, 1, 0]).is_err());
    }
}
