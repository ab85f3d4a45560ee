//! Replay of mapper output on a simulated device.

#![allow(dead_code)]

use std::collections::BTreeMap;

use qroute_ir::{Command, CommandKind, QubitId, StandardGate};

/// One operation as seen by a logical qubit: command name and its logical
/// operands, controls first.
pub type Event = (String, Vec<QubitId>);

/// Per-qubit operation history of a logical command stream.
pub fn logical_history(commands: &[Command]) -> BTreeMap<QubitId, Vec<Event>> {
    let mut history: BTreeMap<QubitId, Vec<Event>> = BTreeMap::new();
    for command in commands.iter().filter(|c| !c.is_flush()) {
        let qubits: Vec<QubitId> = command.all_qubits().collect();
        for &q in &qubits {
            history
                .entry(q)
                .or_default()
                .push((command.name().to_string(), qubits.clone()));
        }
    }
    history
}

/// Replays physical commands, checking device-level rules, and rebuilds the
/// per-qubit history on logical ids.
pub struct Replay<F> {
    adjacent: F,
    slots: BTreeMap<u32, Option<QubitId>>,
    pub history: BTreeMap<QubitId, Vec<Event>>,
    pub num_swaps: usize,
}

impl<F: Fn(u32, u32) -> bool> Replay<F> {
    pub fn new(adjacent: F) -> Self {
        Self {
            adjacent,
            slots: BTreeMap::new(),
            history: BTreeMap::new(),
            num_swaps: 0,
        }
    }

    pub fn run(&mut self, commands: &[Command]) -> Result<(), String> {
        for command in commands {
            self.step(command)?;
        }
        Ok(())
    }

    fn logical(&self, backend: QubitId) -> Result<QubitId, String> {
        match self.slots.get(&backend.0) {
            Some(Some(q)) => Ok(*q),
            Some(None) => Err(format!("backend {backend} holds no logical qubit")),
            None => Err(format!("backend {backend} is not allocated")),
        }
    }

    fn record(&mut self, name: &str, qubits: Vec<QubitId>) {
        for &q in &qubits {
            self.history
                .entry(q)
                .or_default()
                .push((name.to_string(), qubits.clone()));
        }
    }

    fn step(&mut self, command: &Command) -> Result<(), String> {
        let backend: Vec<QubitId> = command.all_qubits().collect();
        match &command.kind {
            CommandKind::Flush => Ok(()),
            CommandKind::Allocate => {
                let id = backend[0].0;
                if self.slots.contains_key(&id) {
                    return Err(format!("backend {id} allocated twice"));
                }
                let tag = command.logical_id_tag();
                self.slots.insert(id, tag);
                if let Some(logical) = tag {
                    self.record("allocate", vec![logical]);
                }
                Ok(())
            }
            CommandKind::Deallocate => {
                let id = backend[0].0;
                let slot = self
                    .slots
                    .remove(&id)
                    .ok_or_else(|| format!("backend {id} freed while not allocated"))?;
                match (slot, command.logical_id_tag()) {
                    (Some(held), Some(tag)) if held == tag => {
                        self.record("deallocate", vec![held]);
                        Ok(())
                    }
                    (None, None) => Ok(()),
                    (held, tag) => Err(format!("deallocate of {id}: holds {held:?}, tag {tag:?}")),
                }
            }
            CommandKind::Gate(StandardGate::Swap) => {
                let (a, b) = (backend[0].0, backend[1].0);
                if !(self.adjacent)(a, b) {
                    return Err(format!("swap on distant backend ids {a} and {b}"));
                }
                let first = self.slots.get(&a).copied().ok_or("swap on free slot")?;
                let second = self.slots.get(&b).copied().ok_or("swap on free slot")?;
                self.slots.insert(a, second);
                self.slots.insert(b, first);
                self.num_swaps += 1;
                Ok(())
            }
            _ => {
                let logical = backend
                    .iter()
                    .map(|&q| self.logical(q))
                    .collect::<Result<Vec<_>, _>>()?;
                if backend.len() == 2 && !(self.adjacent)(backend[0].0, backend[1].0) {
                    return Err(format!("{} on distant qubits {backend:?}", command.name()));
                }
                if command.is_measure() && command.logical_id_tag() != Some(logical[0]) {
                    return Err("measurement without logical id tag".into());
                }
                self.record(command.name(), logical);
                Ok(())
            }
        }
    }
}
