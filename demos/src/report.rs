//! Routing a circuit and summarising the result.

use serde::Serialize;

use qroute_ir::Command;
use qroute_mapper::{Mapper, MapperResult, MappingStatistics, RoutingStrategy};

/// Summary of one routed circuit.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub strategy: String,
    pub input_commands: usize,
    pub output_commands: usize,
    pub inserted_swaps: usize,
    pub statistics: MappingStatistics,
}

/// Push `circuit` through `mapper` and collect the physical output.
pub fn route<R: RoutingStrategy>(
    mapper: &mut Mapper<R>,
    circuit: Vec<Command>,
) -> MapperResult<(Vec<Command>, RouteReport)> {
    let input_commands = circuit.len();
    let mut output = Vec::with_capacity(input_commands);
    mapper.receive(circuit, &mut output)?;

    let report = RouteReport {
        strategy: mapper.router().name().to_string(),
        input_commands,
        output_commands: output.len(),
        inserted_swaps: mapper.statistics().total_swaps(),
        statistics: mapper.statistics().clone(),
    };
    Ok((output, report))
}
