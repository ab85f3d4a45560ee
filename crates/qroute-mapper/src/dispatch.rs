//! Forwarding of buffered commands that are executable under the current
//! mapping.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::debug;

use qroute_ir::{Command, CommandSink, QubitId, Tag};

use crate::buffer::{BufferedCommand, CommandShape};
use crate::mapping::Mapping;
use crate::strategy::RoutingStrategy;
use crate::topology::Topology;

/// Send every buffered command that can run under `mapping`, in order, and
/// keep the rest buffered.
///
/// A qubit whose command had to stay behind becomes inactive, so later
/// commands on it stay behind too and per-qubit order is kept. Returns the
/// number of commands sent.
pub(crate) fn send_possible_commands<R, S>(
    router: &R,
    mapping: &mut Mapping,
    allocated: &mut BTreeSet<QubitId>,
    stored: &mut Vec<BufferedCommand>,
    sink: &mut S,
) -> usize
where
    R: RoutingStrategy,
    S: CommandSink + ?Sized,
{
    let mut active: FxHashSet<QubitId> =
        allocated.iter().copied().chain(mapping.logical_ids()).collect();
    let mut kept = Vec::with_capacity(stored.len());
    let mut sent = 0;
    let mut pending = std::mem::take(stored).into_iter();

    while let Some(buffered) = pending.next() {
        if active.is_empty() {
            kept.push(buffered);
            kept.extend(pending.by_ref());
            break;
        }
        match buffered.shape {
            CommandShape::Allocate(qubit) => match mapping.physical(qubit) {
                Some(mapped) => {
                    allocated.insert(qubit);
                    sink.send(
                        Command::allocate(QubitId(router.backend_id(mapped)))
                            .with_tag(Tag::LogicalQubitId(qubit)),
                    );
                    sent += 1;
                }
                None => kept.push(buffered),
            },
            CommandShape::Deallocate(qubit) => {
                match mapping.physical(qubit).filter(|_| active.contains(&qubit)) {
                    Some(mapped) => {
                        sink.send(
                            Command::deallocate(QubitId(router.backend_id(mapped)))
                                .with_tag(Tag::LogicalQubitId(qubit)),
                        );
                        mapping.remove(qubit);
                        allocated.remove(&qubit);
                        active.remove(&qubit);
                        sent += 1;
                    }
                    None => kept.push(buffered),
                }
            }
            shape => {
                if executable(router, mapping, &active, shape) {
                    sink.send(to_backend(router, mapping, &buffered.command));
                    sent += 1;
                } else {
                    for qubit in shape.qubits() {
                        active.remove(&qubit);
                    }
                    kept.push(buffered);
                }
            }
        }
    }

    *stored = kept;
    debug!(sent, kept = stored.len(), "dispatched buffered commands");
    sent
}

/// A gate can run when all its qubits are active and, for two qubits, they
/// sit on neighbouring positions.
fn executable<R: RoutingStrategy>(
    router: &R,
    mapping: &Mapping,
    active: &FxHashSet<QubitId>,
    shape: CommandShape,
) -> bool {
    if !shape.qubits().all(|q| active.contains(&q) && mapping.contains(q)) {
        return false;
    }
    match shape {
        CommandShape::Pair(a, b) => match (mapping.physical(a), mapping.physical(b)) {
            (Some(pa), Some(pb)) => router.topology().are_adjacent(pa, pb),
            _ => false,
        },
        _ => true,
    }
}

/// Rewrite a command onto backend ids. Measurements carry the logical id.
fn to_backend<R: RoutingStrategy>(router: &R, mapping: &Mapping, command: &Command) -> Command {
    let rewritten = command.map_qubits(|q| {
        mapping
            .physical(q)
            .map_or(q, |mapped| QubitId(router.backend_id(mapped)))
    });
    match (command.is_measure(), command.first_target()) {
        (true, Some(logical)) if rewritten.logical_id_tag().is_none() => {
            rewritten.with_tag(Tag::LogicalQubitId(logical))
        }
        _ => rewritten,
    }
}
