//! qroute Qubit Mapper
//!
//! This crate maps a stream of commands on logical qubits onto hardware
//! whose two-qubit gates only act on nearest neighbours. Commands are
//! buffered; whenever the buffer fills up, or a flush arrives, the mapper
//! picks a new placement, moves qubits there with SWAP gates, and forwards
//! everything that became executable.
//!
//! # Overview
//!
//! Each remap round:
//! 1. **Dispatch**: forward buffered commands that already run under the
//!    current mapping
//! 2. **Segments**: walk the buffer and collect chains of qubits that should
//!    sit next to each other
//! 3. **Placement**: lay the segments out, keeping qubits near their old
//!    positions
//! 4. **Swaps**: sort the old arrangement into the new one using only
//!    neighbouring swaps
//! 5. **Dispatch** again under the new mapping
//!
//! ```text
//!  logical commands
//!        │
//!        ▼
//! ┌─────────────┐     ┌──────────────────────────────┐
//! │   Mapper    │ ──► │ RoutingStrategy              │
//! │  (buffer)   │     │  ChainRouter / GridRouter    │
//! └─────────────┘     └──────────────────────────────┘
//!        │
//!        ▼
//!  physical commands + SWAPs
//! ```
//!
//! # Example
//!
//! ```rust
//! use qroute_ir::{Command, QubitId, StandardGate};
//! use qroute_mapper::{LinearMapper, LinearMapperConfig};
//!
//! let mut mapper = LinearMapper::new(LinearMapperConfig::new(3)).unwrap();
//! let mut out = Vec::new();
//! mapper
//!     .receive(
//!         [
//!             Command::allocate(QubitId(0)),
//!             Command::allocate(QubitId(1)),
//!             Command::allocate(QubitId(2)),
//!             Command::gate(StandardGate::CX, [QubitId(0), QubitId(2)]),
//!             Command::flush(),
//!         ],
//!         &mut out,
//!     )
//!     .unwrap();
//!
//! assert!(out.last().unwrap().is_flush());
//! assert_eq!(mapper.pending(), 0);
//! ```
//!
//! # Topologies
//!
//! - [`LinearMapper`]: an open or cyclic chain; see [`chain`]
//! - [`GridMapper`]: a rectangular grid with optional backend id table; see
//!   [`grid`]

pub mod buffer;
pub mod chain;
pub mod config;
mod dispatch;
pub mod error;
pub mod grid;
pub mod mapper;
pub mod mapping;
pub mod stats;
pub mod strategy;
pub mod topology;

pub use buffer::{BufferedCommand, CommandShape};
pub use chain::ChainRouter;
pub use config::{CostFunction, GridMapperConfig, LinearMapperConfig, MapperConfig};
pub use error::{MapperError, MapperResult};
pub use grid::{CostFn, GridRouter};
pub use mapper::{GridMapper, LinearMapper, Mapper};
pub use mapping::{Mapping, Swap};
pub use stats::{MappingStatistics, swap_depth};
pub use strategy::{RoundInput, RoutePlan, RoutingStrategy};
pub use topology::{Chain, Grid, Topology};
