//! Error types for the fallible operations of the crate.

use std::path::PathBuf;

use thiserror::Error;

/// An error reported by the foreign interface.
///
/// Only I/O and parsing can fail recoverably; everything else in the crate
/// is either a normal absence (`Option::None`) or a caller precondition
/// that panics when violated.
#[derive(Debug, Error)]
pub enum LlvmError {
    /// The file backing a memory buffer could not be read.
    #[error("failed to read {}: {message}", path.display())]
    ReadFile {
        /// Path that was handed to the foreign interface.
        path: PathBuf,
        /// Diagnostic supplied by the foreign interface.
        message: String,
    },

    /// The module parser rejected the input.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// Path of the rejected input.
        path: PathBuf,
        /// Diagnostic supplied by the foreign interface.
        message: String,
    },

    /// Bitcode serialization reported a nonzero status.
    #[error("failed to write bitcode to {} (status {status})", path.display())]
    WriteBitcode {
        /// Destination path.
        path: PathBuf,
        /// Foreign status code; zero would have meant success.
        status: i32,
    },
}
