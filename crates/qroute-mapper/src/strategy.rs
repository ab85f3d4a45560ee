//! The seam between the shared remap loop and a concrete topology.

use std::collections::BTreeSet;

use qroute_ir::QubitId;

use crate::buffer::BufferedCommand;
use crate::error::MapperResult;
use crate::mapping::{Mapping, Swap};
use crate::topology::Topology;

/// Everything a strategy may look at when planning a remap.
#[derive(Debug, Clone, Copy)]
pub struct RoundInput<'a> {
    /// Logical qubits already allocated on hardware.
    pub allocated: &'a BTreeSet<QubitId>,
    /// Buffered commands in arrival order.
    pub commands: &'a [BufferedCommand],
    /// Mapping in force before the remap, on mapped ids.
    pub current: &'a Mapping,
}

/// Outcome of planning a remap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePlan {
    /// The new mapping, on mapped ids.
    pub mapping: Mapping,
    /// Swaps, on mapped ids, turning the current mapping into the new one.
    pub swaps: Vec<Swap>,
}

/// A routing strategy for one topology.
///
/// Strategies work on mapped ids, which number the positions of the
/// topology from zero. The strategy also owns the translation to the ids
/// the backend expects.
pub trait RoutingStrategy {
    /// The topology this strategy routes on.
    type Topology: Topology;

    /// Get the name of this strategy.
    fn name(&self) -> &str;

    /// Get the topology.
    fn topology(&self) -> &Self::Topology;

    /// Backend id of a mapped id.
    fn backend_id(&self, mapped_id: u32) -> u32 {
        mapped_id
    }

    /// Mapped id of a backend id, if the backend id exists.
    fn mapped_id(&self, backend_id: u32) -> Option<u32> {
        (backend_id < self.topology().num_qubits()).then_some(backend_id)
    }

    /// Compute the next mapping and the swaps leading to it.
    fn plan(&mut self, input: &RoundInput<'_>) -> MapperResult<RoutePlan>;
}
