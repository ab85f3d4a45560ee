//! Mapping onto a 1-D chain of nearest-neighbour qubits.

pub mod placement;
pub mod segments;
pub mod sort;

use tracing::debug;

use crate::error::MapperResult;
use crate::strategy::{RoundInput, RoutePlan, RoutingStrategy};
use crate::topology::{Chain, Topology};

pub use placement::place_segments;
pub use segments::{Segments, build_segments};
pub use sort::odd_even_transposition_swaps;

/// Routing strategy for an open or cyclic chain.
///
/// Segments are laid out in chain order and the old arrangement is sorted
/// into the new one with an odd-even transposition network.
#[derive(Debug, Clone)]
pub struct ChainRouter {
    chain: Chain,
}

impl ChainRouter {
    /// Create a router for the given chain.
    pub fn new(chain: Chain) -> Self {
        Self { chain }
    }
}

impl RoutingStrategy for ChainRouter {
    type Topology = Chain;

    fn name(&self) -> &'static str {
        "ChainRouter"
    }

    fn topology(&self) -> &Chain {
        &self.chain
    }

    fn plan(&mut self, input: &RoundInput<'_>) -> MapperResult<RoutePlan> {
        let num_qubits = self.chain.num_qubits();
        let segments = build_segments(
            num_qubits,
            self.chain.is_cyclic(),
            input.allocated,
            input.commands,
        );
        debug!(
            segments = segments.segments.len(),
            allocated = segments.allocated.len(),
            "built chain segments"
        );
        let mapping = place_segments(num_qubits, &segments, input.current);
        let swaps = odd_even_transposition_swaps(num_qubits, input.current, &mapping);
        Ok(RoutePlan { mapping, swaps })
    }
}
