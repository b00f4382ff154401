//! Error types for the Paren host.
//!
//! The language itself is total: evaluation never surfaces an error to a
//! script (see the runtime module). This enum covers the host surface
//! around the kernel - file handling in the CLI and embedding layer, and
//! the ahead-of-time driver emitter.

use std::path::PathBuf;

use thiserror::Error;

/// Host-side errors
#[derive(Error, Debug)]
pub enum Error {
    /// A source or import file could not be read
    #[error("cannot open file: {}", path.display())]
    FileRead {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written
    #[error("cannot write file: {}", path.display())]
    FileWrite {
        /// Path that failed to open for writing
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The driver emitter could not produce a module
    #[error("emit error: {0}")]
    Emit(String),

    /// An external tool required by the AOT path failed or is missing
    ///
    /// **Triggered by:** `llc` absent from PATH, or exiting non-zero when
    /// lowering the emitted IR to assembly or an object file.
    #[error("toolchain error: {tool}: {reason}")]
    Toolchain {
        /// Tool that failed
        tool: String,
        /// Failure description
        reason: String,
    },
}

/// Result type for Paren host operations
pub type Result<T> = std::result::Result<T, Error>;
