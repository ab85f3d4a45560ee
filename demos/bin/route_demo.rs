//! Qubit Mapping Demo
//!
//! Routes a generated circuit onto a chain or grid and reports the swaps
//! the mapper had to insert.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use qroute_demos::circuits::{ghz_circuit, qft_circuit, random_circuit};
use qroute_demos::report::{RouteReport, route};
use qroute_demos::{print_header, print_result, print_section, print_success};
use qroute_ir::Command;
use qroute_mapper::{
    CostFunction, GridMapper, GridMapperConfig, LinearMapper, LinearMapperConfig, MapperConfig,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TopologyArg {
    Linear,
    Grid,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CircuitArg {
    Ghz,
    Qft,
    Random,
}

#[derive(Parser, Debug)]
#[command(name = "route-demo")]
#[command(about = "Route a circuit onto nearest-neighbour hardware")]
struct Args {
    /// YAML mapper configuration; overrides the topology flags
    #[arg(short, long, env = "QROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Hardware topology
    #[arg(short, long, value_enum, default_value = "linear")]
    topology: TopologyArg,

    /// Number of qubits of a linear chain
    #[arg(short = 'n', long, default_value = "8")]
    qubits: u32,

    /// Connect the two ends of the chain
    #[arg(long)]
    cyclic: bool,

    /// Grid rows
    #[arg(long, default_value = "3")]
    rows: u32,

    /// Grid columns
    #[arg(long, default_value = "3")]
    columns: u32,

    /// Minimise swap count instead of swap depth on grids
    #[arg(long)]
    swap_count: bool,

    /// Circuit to route
    #[arg(long, value_enum, default_value = "qft")]
    circuit: CircuitArg,

    /// Number of gates of a random circuit
    #[arg(long, default_value = "40")]
    gates: usize,

    /// Seed of a random circuit
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Print every routed command
    #[arg(long)]
    show_commands: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn mapper_config(args: &Args) -> Result<MapperConfig> {
    if let Some(path) = &args.config {
        return MapperConfig::from_file(path)
            .with_context(|| format!("loading mapper config {}", path.display()));
    }
    let config = match args.topology {
        TopologyArg::Linear => {
            MapperConfig::Linear(LinearMapperConfig::new(args.qubits).with_cyclic(args.cyclic))
        }
        TopologyArg::Grid => {
            let optimization = if args.swap_count {
                CostFunction::SwapCount
            } else {
                CostFunction::SwapDepth
            };
            MapperConfig::Grid(
                GridMapperConfig::new(args.rows, args.columns).with_optimization(optimization),
            )
        }
    };
    config.validate()?;
    Ok(config)
}

fn circuit(args: &Args, num_qubits: u32) -> Vec<Command> {
    match args.circuit {
        CircuitArg::Ghz => ghz_circuit(num_qubits),
        CircuitArg::Qft => qft_circuit(num_qubits),
        CircuitArg::Random => random_circuit(num_qubits, args.gates, args.seed),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = mapper_config(&args)?;
    let (output, report): (Vec<Command>, RouteReport) = match config {
        MapperConfig::Linear(config) => {
            let commands = circuit(&args, config.num_qubits);
            info!(topology = "linear", num_qubits = config.num_qubits, "routing");
            route(&mut LinearMapper::new(config)?, commands)?
        }
        MapperConfig::Grid(config) => {
            let commands = circuit(&args, config.num_rows * config.num_columns);
            info!(
                topology = "grid",
                rows = config.num_rows,
                columns = config.num_columns,
                "routing"
            );
            route(&mut GridMapper::new(config)?, commands)?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header("qroute Mapping Demo");

    print_section("Routing");
    print_result("Strategy", &report.strategy);
    print_result("Input commands", report.input_commands);
    print_result("Output commands", report.output_commands);
    print_result("Inserted swaps", report.inserted_swaps);
    print_result("Remaps with swaps", report.statistics.num_mappings);

    if !report.statistics.depth_of_swaps.is_empty() {
        print_section("Swap Depth Histogram");
        for (depth, count) in &report.statistics.depth_of_swaps {
            print_result(&format!("depth {depth}"), count);
        }
    }

    if args.show_commands {
        print_section("Routed Commands");
        for command in &output {
            let qubits: Vec<String> = command.all_qubits().map(|q| q.to_string()).collect();
            println!("  {} {}", command.name(), qubits.join(", "));
        }
    }

    println!();
    print_success("Circuit routed");
    Ok(())
}
