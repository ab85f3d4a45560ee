//! Error types for the mapper crate.

use thiserror::Error;

/// Errors that can occur while mapping a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapperError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qroute_ir::IrError),

    /// The mapped-id to backend-id table is not a bijection.
    #[error("Incorrect mapped_ids_to_backend_ids parameter: {0}")]
    InvalidBackendMapping(String),

    /// Invalid mapper configuration.
    #[error("Invalid mapper configuration: {0}")]
    InvalidConfiguration(String),

    /// A buffered command touches 0 or more than 2 qubits.
    #[error("Invalid command (number of qubits: {num_qubits}): {command}")]
    MalformedCommand {
        /// Total number of qubits of the command.
        num_qubits: usize,
        /// Rendering of the offending command.
        command: String,
    },

    /// A remap round did not shrink the command buffer.
    #[error(
        "Mapper is potentially in an infinite loop ({remaining} commands stuck). \
         It is likely that the algorithm requires too many qubits. \
         Increase the number of qubits for this mapper."
    )]
    NoProgress {
        /// Number of commands still buffered.
        remaining: usize,
    },

    /// The row-matching step could not decompose the column graph.
    #[error("Row matching failed: {0}")]
    RowMatching(String),

    /// Failed to read a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration document.
    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_yaml_ng::Error),
}

/// Result type for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;
