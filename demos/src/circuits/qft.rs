//! Quantum Fourier transform.

use std::f64::consts::PI;

use qroute_ir::{Command, QubitId, StandardGate};

use super::wrap;

/// Textbook QFT without the final qubit reversal.
///
/// Every pair of qubits meets in a controlled phase, which makes this the
/// worst case for nearest-neighbour hardware.
pub fn qft_circuit(num_qubits: u32) -> Vec<Command> {
    let mut body = Vec::new();
    for target in 0..num_qubits {
        body.push(Command::gate(StandardGate::H, [QubitId(target)]));
        for control in target + 1..num_qubits {
            let angle = PI / f64::from(1_u32 << (control - target).min(31));
            body.push(Command::controlled(
                StandardGate::P(angle),
                [QubitId(control)],
                [QubitId(target)],
            ));
        }
    }
    wrap(num_qubits, body)
}
