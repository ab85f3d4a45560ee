//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur when validating commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate requires a different number of target qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of target qubits.
        expected: usize,
        /// Actual number of target qubits provided.
        got: usize,
    },

    /// The same qubit appears twice in one command.
    #[error("Duplicate qubit {qubit} in command '{command}'")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Name of the command.
        command: String,
    },

    /// A command that must act on qubits has none.
    #[error("Command '{0}' acts on no qubits")]
    EmptyCommand(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
