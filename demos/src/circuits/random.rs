//! Seeded random circuits.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use qroute_ir::{Command, QubitId, StandardGate};

use super::wrap;

/// `num_gates` random gates; roughly half of them act on two qubits.
pub fn random_circuit(num_qubits: u32, num_gates: usize, seed: u64) -> Vec<Command> {
    if num_qubits == 0 {
        return wrap(0, Vec::new());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut body = Vec::with_capacity(num_gates);
    for _ in 0..num_gates {
        let a = rng.gen_range(0..num_qubits);
        if num_qubits >= 2 && rng.gen_bool(0.5) {
            let b = (a + rng.gen_range(1..num_qubits)) % num_qubits;
            body.push(Command::gate(StandardGate::CZ, [QubitId(a), QubitId(b)]));
        } else {
            let gate = match rng.gen_range(0..3) {
                0 => StandardGate::H,
                1 => StandardGate::T,
                _ => StandardGate::Rz(rng.gen_range(0.0..PI_2)),
            };
            body.push(Command::gate(gate, [QubitId(a)]));
        }
    }
    wrap(num_qubits, body)
}

const PI_2: f64 = 2.0 * std::f64::consts::PI;
