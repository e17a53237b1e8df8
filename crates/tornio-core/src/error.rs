//! Error handling for Tornio
//!
//! Provides error types for all layers of the application:
//! - G-Code errors (parsing/validation)
//! - Storage errors (program repository)
//! - Simulation errors (engine state machine)
//! - Deploy errors (firmware upload)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Every variant carries the 1-based line number and the raw line text so
/// the operator can locate the offending instruction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// Malformed or unrecognized opcode
    #[error("Invalid instruction '{raw_text}' at line {line_number}")]
    InvalidInstruction {
        /// The line number where the instruction was found.
        line_number: u32,
        /// The trimmed text of the line.
        raw_text: String,
    },

    /// A recognized operand whose value is not a valid number
    #[error("Invalid operand '{operand}' in '{raw_text}' at line {line_number}")]
    InvalidOperand {
        /// The line number where the operand was found.
        line_number: u32,
        /// The trimmed text of the line.
        raw_text: String,
        /// The offending operand token.
        operand: String,
    },
}

impl GcodeError {
    /// Line number of the failing instruction
    pub fn line_number(&self) -> u32 {
        match self {
            Self::InvalidInstruction { line_number, .. }
            | Self::InvalidOperand { line_number, .. } => *line_number,
        }
    }

    /// Raw text of the failing instruction
    pub fn raw_text(&self) -> &str {
        match self {
            Self::InvalidInstruction { raw_text, .. } | Self::InvalidOperand { raw_text, .. } => {
                raw_text
            }
        }
    }
}

/// Program storage error type
#[derive(Error, Debug)]
pub enum StorageError {
    /// Program name is empty
    #[error("Program name cannot be empty")]
    EmptyName,

    /// Program body is empty
    #[error("Program '{name}' has no instructions")]
    EmptyProgram {
        /// The program name.
        name: String,
    },

    /// Program name would escape the repository directory
    #[error("Invalid program name: '{name}'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Program does not exist in the repository
    #[error("Program not found: {name}")]
    NotFound {
        /// The program name.
        name: String,
    },

    /// Underlying read/write failure
    #[error("I/O error on {context}: {source}")]
    Io {
        /// What was being accessed.
        context: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Wrap an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Simulation engine error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Operation not permitted in the current phase
    #[error("Cannot {operation} while simulation is {phase}")]
    InvalidState {
        /// The requested operation.
        operation: String,
        /// The current phase name.
        phase: String,
    },
}

/// Firmware deploy error type
#[derive(Error, Debug)]
pub enum DeployError {
    /// Writing the sketch failed
    #[error("Failed to write sketch {path}: {source}")]
    Io {
        /// The sketch path.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The external compiler/uploader could not be started
    #[error("Deploy tool not available at {tool}: {reason}")]
    ToolNotFound {
        /// The tool path.
        tool: String,
        /// The reason the tool could not be started.
        reason: String,
    },

    /// Compilation failed
    #[error("Compilation failed: {stderr}")]
    CompileFailed {
        /// Compiler diagnostics.
        stderr: String,
    },

    /// Upload failed
    #[error("Upload to {target} failed: {stderr}")]
    UploadFailed {
        /// The upload target.
        target: String,
        /// Uploader diagnostics.
        stderr: String,
    },

    /// Target identifier is empty or malformed
    #[error("Invalid deploy target: '{target}'")]
    InvalidTarget {
        /// The rejected target.
        target: String,
    },
}

/// Main error type for Tornio
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Simulation error
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Deploy error
    #[error(transparent)]
    Deploy(#[from] DeployError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }

    /// Check if this is an empty-input error (empty name or body)
    pub fn is_empty_input(&self) -> bool {
        matches!(
            self,
            Error::Storage(StorageError::EmptyName | StorageError::EmptyProgram { .. })
        )
    }

    /// Check if this is an I/O failure from an external collaborator
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Storage(StorageError::Io { .. })
                | Error::Deploy(DeployError::Io { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
