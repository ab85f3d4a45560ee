//! Logical circuit generators.
//!
//! Every generator allocates its qubits up front, deallocates them at the
//! end and finishes with a flush, so the output can be fed straight into a
//! mapper.

pub mod ghz;
pub mod qft;
pub mod random;

pub use ghz::ghz_circuit;
pub use qft::qft_circuit;
pub use random::random_circuit;

use qroute_ir::{Command, QubitId};

/// Wrap `body` in allocations, deallocations and a final flush.
pub(crate) fn wrap(num_qubits: u32, body: Vec<Command>) -> Vec<Command> {
    let mut commands: Vec<Command> = (0..num_qubits)
        .map(|q| Command::allocate(QubitId(q)))
        .collect();
    commands.extend(body);
    commands.extend((0..num_qubits).map(|q| Command::deallocate(QubitId(q))));
    commands.push(Command::flush());
    commands
}
