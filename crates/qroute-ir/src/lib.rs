//! qroute Command Model
//!
//! This crate provides the unit of work that flows through the qroute
//! compiler pipeline: a [`Command`] carrying a gate (or an allocate,
//! deallocate, measure or flush marker), its target qubit registers, its
//! control qubits and a list of [`Tag`]s.
//!
//! Stages hand commands to each other through the [`CommandSink`] trait.
//! The mapper consumes commands on logical qubit ids and emits the same
//! commands rewritten to physical ids.
//!
//! # Example
//!
//! ```rust
//! use qroute_ir::{Command, QubitId, StandardGate};
//!
//! let cnot = Command::controlled(StandardGate::X, [QubitId(1)], [QubitId(0)]);
//! assert_eq!(cnot.num_qubits(), 2);
//! assert!(cnot.validate().is_ok());
//!
//! // Controls come first when iterating over all qubits.
//! let ids: Vec<_> = cnot.all_qubits().collect();
//! assert_eq!(ids, vec![QubitId(1), QubitId(0)]);
//! ```

pub mod command;
pub mod error;
pub mod gate;
pub mod qubit;

pub use command::{Command, CommandKind, CommandSink, Tag};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use qubit::QubitId;
