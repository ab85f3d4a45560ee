//! The buffering mapper shared by all topologies.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::{debug, info, instrument, warn};

use qroute_ir::{Command, CommandSink, QubitId, StandardGate};

use crate::buffer::BufferedCommand;
use crate::chain::ChainRouter;
use crate::config::{GridMapperConfig, LinearMapperConfig};
use crate::dispatch::send_possible_commands;
use crate::error::{MapperError, MapperResult};
use crate::grid::{CostFn, GridRouter};
use crate::mapping::{Mapping, Swap};
use crate::stats::MappingStatistics;
use crate::strategy::{RoundInput, RoutePlan, RoutingStrategy};
use crate::topology::{Chain, Grid, Topology};

/// Mapper for a linear chain.
pub type LinearMapper = Mapper<ChainRouter>;

/// Mapper for a 2-D grid.
pub type GridMapper = Mapper<GridRouter>;

/// Buffers commands on logical qubits and forwards them on physical qubits,
/// inserting swaps so every two-qubit gate acts on neighbouring positions.
#[derive(Debug, Clone)]
pub struct Mapper<R: RoutingStrategy> {
    router: R,
    storage: usize,
    stored_commands: Vec<BufferedCommand>,
    /// `None` until the first remap.
    current_mapping: Option<Mapping>,
    currently_allocated_ids: BTreeSet<QubitId>,
    statistics: MappingStatistics,
}

impl LinearMapper {
    /// Create a mapper for a linear chain.
    pub fn new(config: LinearMapperConfig) -> MapperResult<Self> {
        config.validate()?;
        let chain = Chain::new(config.num_qubits, config.cyclic);
        Ok(Mapper::with_router(ChainRouter::new(chain), config.storage))
    }
}

impl GridMapper {
    /// Create a mapper for a 2-D grid.
    pub fn new(config: GridMapperConfig) -> MapperResult<Self> {
        config.validate()?;
        let grid = Grid::new(config.num_rows, config.num_columns);
        let mut router = GridRouter::new(
            grid,
            config.optimization,
            config.num_optimization_steps,
            config.seed,
        );
        if let Some(table) = config.mapped_ids_to_backend_ids {
            router = router.with_backend_ids(table)?;
        }
        Ok(Mapper::with_router(router, config.storage))
    }

    /// Replace the cost function of the permutation search.
    pub fn with_cost_function(mut self, cost: CostFn) -> Self {
        self.router = self.router.with_cost_function(cost);
        self
    }
}

impl<R: RoutingStrategy> Mapper<R> {
    /// Create a mapper around a routing strategy.
    pub fn with_router(router: R, storage: usize) -> Self {
        Self {
            router,
            storage,
            stored_commands: Vec::new(),
            current_mapping: None,
            currently_allocated_ids: BTreeSet::new(),
            statistics: MappingStatistics::default(),
        }
    }

    /// Only commands on at most two qubits can be mapped.
    pub fn is_available(&self, command: &Command) -> bool {
        command.num_qubits() <= 2
    }

    /// Receive a batch of commands.
    ///
    /// A flush drains the buffer completely and is then forwarded. Once the
    /// batch is in, one remap round runs if the buffer has reached the
    /// storage threshold.
    pub fn receive<S>(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
        sink: &mut S,
    ) -> MapperResult<()>
    where
        S: CommandSink + ?Sized,
    {
        for command in commands {
            if command.is_flush() {
                while !self.stored_commands.is_empty() {
                    self.run(sink)?;
                }
                sink.send(command);
            } else {
                self.stored_commands.push(BufferedCommand::classify(command)?);
            }
        }
        if !self.stored_commands.is_empty() && self.stored_commands.len() >= self.storage {
            self.run(sink)?;
        }
        Ok(())
    }

    /// Run one remap round.
    #[instrument(skip(self, sink), fields(strategy = self.router.name(), pending = self.stored_commands.len()))]
    fn run<S>(&mut self, sink: &mut S) -> MapperResult<()>
    where
        S: CommandSink + ?Sized,
    {
        let before = self.stored_commands.len();
        let current = match self.current_mapping.take() {
            None => Mapping::new(),
            Some(mut mapping) => {
                send_possible_commands(
                    &self.router,
                    &mut mapping,
                    &mut self.currently_allocated_ids,
                    &mut self.stored_commands,
                    sink,
                );
                if self.stored_commands.is_empty() {
                    self.current_mapping = Some(mapping);
                    return Ok(());
                }
                mapping
            }
        };

        let plan = self.router.plan(&RoundInput {
            allocated: &self.currently_allocated_ids,
            commands: &self.stored_commands,
            current: &current,
        });
        let RoutePlan { mut mapping, swaps } = match plan {
            Ok(plan) => plan,
            Err(err) => {
                self.current_mapping = Some(current);
                return Err(err);
            }
        };

        if !swaps.is_empty() {
            self.emit_swaps(&current, &mapping, &swaps, sink);
        }

        send_possible_commands(
            &self.router,
            &mut mapping,
            &mut self.currently_allocated_ids,
            &mut self.stored_commands,
            sink,
        );
        self.current_mapping = Some(mapping);

        let remaining = self.stored_commands.len();
        if remaining == before {
            warn!(remaining, "remap round made no progress");
            return Err(MapperError::NoProgress { remaining });
        }
        debug!(sent = before - remaining, remaining, "remap round done");
        Ok(())
    }

    /// Allocate the idle positions, swap, and free the positions that end
    /// up idle again.
    fn emit_swaps<S>(&mut self, current: &Mapping, new: &Mapping, swaps: &[Swap], sink: &mut S)
    where
        S: CommandSink + ?Sized,
    {
        let topology = self.router.topology();
        let occupied = |mapping: &Mapping| -> FxHashSet<u32> {
            self.currently_allocated_ids
                .iter()
                .filter_map(|&logical| mapping.physical(logical))
                .collect()
        };

        let before = occupied(current);
        for mapped in topology.positions().filter(|p| !before.contains(p)) {
            sink.send(Command::allocate(QubitId(self.router.backend_id(mapped))));
        }
        for &(a, b) in swaps {
            sink.send(Command::gate(
                StandardGate::Swap,
                [
                    QubitId(self.router.backend_id(a)),
                    QubitId(self.router.backend_id(b)),
                ],
            ));
        }
        let after = occupied(new);
        for mapped in topology.positions().filter(|p| !after.contains(p)) {
            sink.send(Command::deallocate(QubitId(self.router.backend_id(mapped))));
        }

        self.statistics.record(swaps);
        info!(
            swaps = swaps.len(),
            depth = crate::stats::swap_depth(swaps),
            num_mappings = self.statistics.num_mappings,
            "inserted swaps"
        );
    }

    /// Number of remaps that needed swaps.
    pub fn num_mappings(&self) -> usize {
        self.statistics.num_mappings
    }

    /// Remap statistics.
    pub fn statistics(&self) -> &MappingStatistics {
        &self.statistics
    }

    /// Current mapping on backend ids, if a remap has happened.
    pub fn current_mapping(&self) -> Option<Mapping> {
        self.current_mapping
            .as_ref()
            .map(|mapping| mapping.translate(|mapped| self.router.backend_id(mapped)))
    }

    /// Current mapping on mapped ids (row-major cells on a grid).
    pub fn row_major_mapping(&self) -> Option<&Mapping> {
        self.current_mapping.as_ref()
    }

    /// Install a mapping given on backend ids.
    pub fn set_current_mapping(&mut self, mapping: &Mapping) -> MapperResult<()> {
        let mut mapped = Mapping::new();
        for (logical, backend) in mapping.iter() {
            let id = self.router.mapped_id(backend).ok_or_else(|| {
                MapperError::InvalidConfiguration(format!("unknown backend id {backend}"))
            })?;
            mapped.insert(logical, id);
        }
        self.current_mapping = Some(mapped);
        Ok(())
    }

    /// Logical qubits currently allocated on hardware.
    pub fn allocated_ids(&self) -> &BTreeSet<QubitId> {
        &self.currently_allocated_ids
    }

    /// Number of buffered commands.
    pub fn pending(&self) -> usize {
        self.stored_commands.len()
    }

    /// The routing strategy.
    pub fn router(&self) -> &R {
        &self.router
    }
}
