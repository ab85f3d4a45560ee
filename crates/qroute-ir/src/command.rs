//! Commands exchanged between compiler stages.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// The kind of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    /// A quantum gate operation.
    Gate(StandardGate),
    /// Measurement of a single qubit.
    Measure,
    /// Bring a qubit into existence.
    Allocate,
    /// Release a qubit.
    Deallocate,
    /// Marker asking every stage to process everything it buffered.
    Flush,
}

/// Metadata attached to a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// The logical id of the qubit a re-emitted command refers to.
    LogicalQubitId(QubitId),
    /// Free-form label.
    Label(String),
}

/// A command with its operands.
///
/// Target qubits are grouped into registers (a SWAP has two registers of
/// one qubit each); control qubits are kept apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// What the command does.
    pub kind: CommandKind,
    /// Target qubit registers.
    pub qubits: Vec<Vec<QubitId>>,
    /// Control qubits.
    pub controls: Vec<QubitId>,
    /// Attached tags.
    pub tags: Vec<Tag>,
}

impl Command {
    fn new(kind: CommandKind, qubits: Vec<Vec<QubitId>>) -> Self {
        Self {
            kind,
            qubits,
            controls: vec![],
            tags: vec![],
        }
    }

    /// Allocate a qubit.
    pub fn allocate(qubit: QubitId) -> Self {
        Self::new(CommandKind::Allocate, vec![vec![qubit]])
    }

    /// Deallocate a qubit.
    pub fn deallocate(qubit: QubitId) -> Self {
        Self::new(CommandKind::Deallocate, vec![vec![qubit]])
    }

    /// Measure a qubit.
    pub fn measure(qubit: QubitId) -> Self {
        Self::new(CommandKind::Measure, vec![vec![qubit]])
    }

    /// Flush marker.
    pub fn flush() -> Self {
        Self::new(CommandKind::Flush, vec![])
    }

    /// Gate acting on the given target qubits, one register per qubit.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::new(
            CommandKind::Gate(gate),
            qubits.into_iter().map(|q| vec![q]).collect(),
        )
    }

    /// Gate acting on the given target qubits with additional controls.
    pub fn controlled(
        gate: StandardGate,
        controls: impl IntoIterator<Item = QubitId>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        let mut cmd = Self::gate(gate, qubits);
        cmd.controls = controls.into_iter().collect();
        cmd
    }

    /// Attach a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// All qubits touched by this command: controls first, then targets in
    /// register order.
    pub fn all_qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.controls
            .iter()
            .copied()
            .chain(self.qubits.iter().flatten().copied())
    }

    /// Total number of qubits (targets + controls).
    pub fn num_qubits(&self) -> usize {
        self.controls.len() + self.qubits.iter().map(Vec::len).sum::<usize>()
    }

    /// The first target qubit, if any.
    pub fn first_target(&self) -> Option<QubitId> {
        self.qubits.iter().flatten().next().copied()
    }

    /// Get the name of the command.
    pub fn name(&self) -> &str {
        match &self.kind {
            CommandKind::Gate(g) => g.name(),
            CommandKind::Measure => "measure",
            CommandKind::Allocate => "allocate",
            CommandKind::Deallocate => "deallocate",
            CommandKind::Flush => "flush",
        }
    }

    /// Check if this is a flush marker.
    pub fn is_flush(&self) -> bool {
        matches!(self.kind, CommandKind::Flush)
    }

    /// Check if this is an allocation.
    pub fn is_allocate(&self) -> bool {
        matches!(self.kind, CommandKind::Allocate)
    }

    /// Check if this is a deallocation.
    pub fn is_deallocate(&self) -> bool {
        matches!(self.kind, CommandKind::Deallocate)
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, CommandKind::Measure)
    }

    /// The logical-id tag, if one is attached.
    pub fn logical_id_tag(&self) -> Option<QubitId> {
        self.tags.iter().find_map(|t| match t {
            Tag::LogicalQubitId(id) => Some(*id),
            Tag::Label(_) => None,
        })
    }

    /// Copy of this command with every qubit id rewritten through `f`.
    #[must_use]
    pub fn map_qubits(&self, mut f: impl FnMut(QubitId) -> QubitId) -> Self {
        Self {
            kind: self.kind.clone(),
            qubits: self
                .qubits
                .iter()
                .map(|reg| reg.iter().map(|&q| f(q)).collect())
                .collect(),
            controls: self.controls.iter().map(|&q| f(q)).collect(),
            tags: self.tags.clone(),
        }
    }

    /// Check operand counts and that no qubit appears twice.
    pub fn validate(&self) -> IrResult<()> {
        let targets: usize = self.qubits.iter().map(Vec::len).sum();
        let expected = match &self.kind {
            CommandKind::Flush => return Ok(()),
            CommandKind::Gate(g) => g.num_qubits(),
            CommandKind::Measure | CommandKind::Allocate | CommandKind::Deallocate => {
                if !self.controls.is_empty() {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: self.name().to_string(),
                        expected: 1,
                        got: self.num_qubits(),
                    });
                }
                1
            }
        };
        if self.num_qubits() == 0 {
            return Err(IrError::EmptyCommand(self.name().to_string()));
        }
        if targets != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: self.name().to_string(),
                expected,
                got: targets,
            });
        }
        let mut seen = Vec::with_capacity(self.num_qubits());
        for q in self.all_qubits() {
            if seen.contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    command: self.name().to_string(),
                });
            }
            seen.push(q);
        }
        Ok(())
    }
}

/// Receiver of commands further down the compiler pipeline.
pub trait CommandSink {
    /// Accept one command.
    fn send(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn send(&mut self, command: Command) {
        self.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_qubits_controls_first() {
        let cmd = Command::controlled(StandardGate::X, [QubitId(1)], [QubitId(0)]);
        assert_eq!(cmd.all_qubits().collect::<Vec<_>>(), vec![QubitId(1), QubitId(0)]);
        assert_eq!(cmd.num_qubits(), 2);
        assert_eq!(cmd.first_target(), Some(QubitId(0)));
    }

    #[test]
    fn test_map_qubits_keeps_tags() {
        let cmd = Command::gate(StandardGate::CZ, [QubitId(3), QubitId(5)])
            .with_tag(Tag::Label("keep".into()));
        let mapped = cmd.map_qubits(|q| QubitId(q.0 * 10));
        assert_eq!(mapped.qubits, vec![vec![QubitId(30)], vec![QubitId(50)]]);
        assert_eq!(mapped.tags, cmd.tags);
    }

    #[test]
    fn test_logical_id_tag() {
        let cmd = Command::allocate(QubitId(2)).with_tag(Tag::LogicalQubitId(QubitId(9)));
        assert_eq!(cmd.logical_id_tag(), Some(QubitId(9)));
        assert_eq!(Command::allocate(QubitId(2)).logical_id_tag(), None);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let cmd = Command::controlled(StandardGate::X, [QubitId(1)], [QubitId(1)]);
        assert!(matches!(
            cmd.validate(),
            Err(IrError::DuplicateQubit { qubit: QubitId(1), .. })
        ));
    }

    #[test]
    fn test_validate_arity() {
        assert!(Command::gate(StandardGate::CX, [QubitId(0), QubitId(1)]).validate().is_ok());
        assert!(matches!(
            Command::gate(StandardGate::CX, [QubitId(0)]).validate(),
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
        assert!(Command::flush().validate().is_ok());
        assert!(Command::measure(QubitId(0)).validate().is_ok());
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Command> = Vec::new();
        sink.send(Command::flush());
        assert_eq!(sink.len(), 1);
        assert!(sink[0].is_flush());
    }

    #[test]
    fn test_command_serde() {
        let cmd = Command::gate(StandardGate::Rz(0.25), [QubitId(4)]);
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
