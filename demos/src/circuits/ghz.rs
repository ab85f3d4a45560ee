//! GHZ state preparation.

use qroute_ir::{Command, QubitId, StandardGate};

use super::wrap;

/// `H` on qubit 0, a CNOT from 0 to every other qubit, then measure all.
pub fn ghz_circuit(num_qubits: u32) -> Vec<Command> {
    let mut body = Vec::new();
    if num_qubits > 0 {
        body.push(Command::gate(StandardGate::H, [QubitId(0)]));
    }
    for target in 1..num_qubits {
        body.push(Command::controlled(
            StandardGate::X,
            [QubitId(0)],
            [QubitId(target)],
        ));
    }
    body.extend((0..num_qubits).map(|q| Command::measure(QubitId(q))));
    wrap(num_qubits, body)
}
