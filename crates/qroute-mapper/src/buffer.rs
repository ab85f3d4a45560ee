//! Buffered commands and their routing-relevant shape.

use qroute_ir::{Command, CommandKind, QubitId};

use crate::error::{MapperError, MapperResult};

/// What a buffered command means to the mapper.
///
/// Resolved once when the command enters the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandShape {
    /// Allocation of a logical qubit.
    Allocate(QubitId),
    /// Deallocation of a logical qubit.
    Deallocate(QubitId),
    /// Any operation on exactly one qubit.
    Single(QubitId),
    /// Any operation on exactly two qubits, controls first.
    Pair(QubitId, QubitId),
}

impl CommandShape {
    /// Qubits touched by the command.
    pub fn qubits(self) -> impl Iterator<Item = QubitId> {
        let (a, b) = match self {
            CommandShape::Allocate(q) | CommandShape::Deallocate(q) | CommandShape::Single(q) => {
                (q, None)
            }
            CommandShape::Pair(a, b) => (a, Some(b)),
        };
        std::iter::once(a).chain(b)
    }
}

/// A command waiting in the mapper's buffer.
#[derive(Debug, Clone)]
pub struct BufferedCommand {
    /// The command, on logical ids.
    pub command: Command,
    /// Its resolved shape.
    pub shape: CommandShape,
}

impl BufferedCommand {
    /// Classify a command for buffering.
    ///
    /// Fails for flush markers and for commands that do not touch one or
    /// two qubits.
    pub fn classify(command: Command) -> MapperResult<Self> {
        let malformed = |command: &Command| MapperError::MalformedCommand {
            num_qubits: command.num_qubits(),
            command: format!("{command:?}"),
        };

        let ids: Vec<QubitId> = command.all_qubits().collect();
        if ids.is_empty() || ids.len() > 2 || command.is_flush() {
            return Err(malformed(&command));
        }
        command.validate()?;

        let shape = match (&command.kind, ids.as_slice()) {
            (CommandKind::Allocate, &[q]) => CommandShape::Allocate(q),
            (CommandKind::Deallocate, &[q]) => CommandShape::Deallocate(q),
            (_, &[q]) => CommandShape::Single(q),
            (_, &[a, b]) => CommandShape::Pair(a, b),
            _ => return Err(malformed(&command)),
        };

        Ok(Self { command, shape })
    }
}
