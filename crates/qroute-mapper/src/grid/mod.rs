//! Mapping onto a 2-D nearest-neighbour grid.
//!
//! The grid is unrolled into a snake so the chain segment builder and
//! placement can pick the next mapping. Swaps are then synthesised on the
//! grid itself.

pub mod matching;
pub mod router;
pub mod snake;

use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::chain::{build_segments, place_segments};
use crate::config::CostFunction;
use crate::error::{MapperError, MapperResult};
use crate::mapping::Swap;
use crate::strategy::{RoundInput, RoutePlan, RoutingStrategy};
use crate::topology::{Grid, Topology};

pub use matching::row_matchings;
pub use router::{PositionRecord, optimal_swaps, position_records};
pub use snake::Snake;

/// Cost of a swap sequence; lower is better.
pub type CostFn = Arc<dyn Fn(&[Swap]) -> usize + Send + Sync>;

/// Routing strategy for a `num_rows x num_columns` grid.
#[derive(Clone)]
pub struct GridRouter {
    grid: Grid,
    snake: Snake,
    backend_ids: Vec<u32>,
    mapped_ids: FxHashMap<u32, u32>,
    cost: CostFn,
    num_optimization_steps: usize,
    rng: StdRng,
}

impl fmt::Debug for GridRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridRouter")
            .field("grid", &self.grid)
            .field("backend_ids", &self.backend_ids)
            .field("num_optimization_steps", &self.num_optimization_steps)
            .finish_non_exhaustive()
    }
}

impl GridRouter {
    /// Create a router with identity backend ids.
    pub fn new(grid: Grid, cost: CostFunction, num_optimization_steps: usize, seed: u64) -> Self {
        let backend_ids: Vec<u32> = grid.positions().collect();
        let mapped_ids = backend_ids.iter().map(|&id| (id, id)).collect();
        Self {
            grid,
            snake: Snake::new(grid),
            backend_ids,
            mapped_ids,
            cost: cost.into_fn(),
            num_optimization_steps,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Use a custom table from mapped ids to backend ids.
    ///
    /// The keys must be exactly `0..num_rows * num_columns` and the values
    /// pairwise distinct.
    pub fn with_backend_ids(
        mut self,
        table: impl IntoIterator<Item = (u32, u32)>,
    ) -> MapperResult<Self> {
        let n = self.grid.num_qubits();
        let mut backend_ids: Vec<Option<u32>> = vec![None; n as usize];
        let mut mapped_ids = FxHashMap::default();
        for (mapped, backend) in table {
            let slot = backend_ids.get_mut(mapped as usize).ok_or_else(|| {
                MapperError::InvalidBackendMapping(format!(
                    "mapped id {mapped} is outside 0..{n}"
                ))
            })?;
            if slot.replace(backend).is_some() {
                return Err(MapperError::InvalidBackendMapping(format!(
                    "mapped id {mapped} appears twice"
                )));
            }
            if mapped_ids.insert(backend, mapped).is_some() {
                return Err(MapperError::InvalidBackendMapping(format!(
                    "backend id {backend} is used twice"
                )));
            }
        }
        self.backend_ids = backend_ids
            .into_iter()
            .enumerate()
            .map(|(mapped, backend)| {
                backend.ok_or_else(|| {
                    MapperError::InvalidBackendMapping(format!("mapped id {mapped} is missing"))
                })
            })
            .collect::<MapperResult<_>>()?;
        self.mapped_ids = mapped_ids;
        Ok(self)
    }

    /// Replace the cost function.
    pub fn with_cost_function(mut self, cost: CostFn) -> Self {
        self.cost = cost;
        self
    }

    /// The snake ordering used for placement.
    pub fn snake(&self) -> &Snake {
        &self.snake
    }
}

impl RoutingStrategy for GridRouter {
    type Topology = Grid;

    fn name(&self) -> &'static str {
        "GridRouter"
    }

    fn topology(&self) -> &Grid {
        &self.grid
    }

    fn backend_id(&self, mapped_id: u32) -> u32 {
        self.backend_ids
            .get(mapped_id as usize)
            .copied()
            .unwrap_or(mapped_id)
    }

    fn mapped_id(&self, backend_id: u32) -> Option<u32> {
        self.mapped_ids.get(&backend_id).copied()
    }

    fn plan(&mut self, input: &RoundInput<'_>) -> MapperResult<RoutePlan> {
        let n = self.grid.num_qubits();
        let snake = self.snake;
        let old_chain = input.current.translate(|id| snake.chain_index(id));
        let segments = build_segments(n, false, input.allocated, input.commands);
        let new_chain = place_segments(n, &segments, &old_chain);
        let mapping = new_chain.translate(|index| snake.grid_id(index));

        let swaps = optimal_swaps(
            &self.grid,
            input.current,
            &mapping,
            self.cost.as_ref(),
            self.num_optimization_steps,
            &mut self.rng,
        )?;
        debug!(
            segments = segments.segments.len(),
            swaps = swaps.len(),
            "planned grid remap"
        );
        Ok(RoutePlan { mapping, swaps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Mapping;
    use qroute_ir::QubitId;
    use std::collections::BTreeSet;

    #[test]
    fn test_identity_backend_ids() {
        let router = GridRouter::new(Grid::new(2, 2), CostFunction::SwapDepth, 50, 11);
        assert_eq!(router.backend_id(3), 3);
        assert_eq!(router.mapped_id(3), Some(3));
        assert_eq!(router.mapped_id(4), None);
    }

    #[test]
    fn test_custom_backend_ids() {
        let router = GridRouter::new(Grid::new(1, 3), CostFunction::SwapDepth, 50, 11)
            .with_backend_ids([(0, 10), (1, 20), (2, 30)])
            .unwrap();
        assert_eq!(router.backend_id(1), 20);
        assert_eq!(router.mapped_id(30), Some(2));
    }

    #[test]
    fn test_rejects_bad_backend_ids() {
        let base = GridRouter::new(Grid::new(1, 3), CostFunction::SwapDepth, 50, 11);
        let cases: [&[(u32, u32)]; 4] = [
            &[(0, 1), (1, 2)],
            &[(0, 1), (1, 1), (2, 3)],
            &[(0, 1), (1, 2), (3, 3)],
            &[(0, 1), (1, 2), (2, 3), (0, 4)],
        ];
        for table in cases {
            assert!(matches!(
                base.clone().with_backend_ids(table.iter().copied()),
                Err(MapperError::InvalidBackendMapping(_))
            ));
        }
    }

    #[test]
    fn test_plan_only_uses_grid_neighbours() {
        let grid = Grid::new(2, 3);
        let mut router = GridRouter::new(grid, CostFunction::SwapCount, 50, 11);
        let allocated: BTreeSet<QubitId> = (0..6).map(QubitId).collect();
        let current = Mapping::from_pairs((0..6).map(|q| (QubitId(q), q)));
        let commands = [crate::buffer::BufferedCommand::classify(qroute_ir::Command::gate(
            qroute_ir::StandardGate::CX,
            [QubitId(0), QubitId(5)],
        ))
        .unwrap()];
        let plan = router
            .plan(&RoundInput {
                allocated: &allocated,
                commands: &commands,
                current: &current,
            })
            .unwrap();

        assert!(plan.swaps.iter().all(|&(a, b)| grid.are_adjacent(a, b)));
        let mut moved = current.clone();
        moved.apply_swaps(&plan.swaps);
        assert_eq!(moved, plan.mapping);
        let p0 = plan.mapping.physical(QubitId(0)).unwrap();
        let p5 = plan.mapping.physical(QubitId(5)).unwrap();
        assert!(grid.are_adjacent(p0, p5));
    }
}
