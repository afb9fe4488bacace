//! Error types for the recording engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the caller of the recording engine.
///
/// All variants are reported synchronously by the operation that triggered
/// them; the engine never retries internally.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The target path already exists when a recording is started
    #[error("Record file already exists: {0}")]
    AlreadyExists(PathBuf),

    /// A recording session is already active
    #[error("Already recording")]
    AlreadyRecording,

    /// Record file creation or write failure; the underlying error carries
    /// the platform error code
    #[error("Record file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A broken invariant inside the engine itself; the current session can
    /// no longer be trusted and should be stopped and discarded
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Invariant violations in the streaming document writer.
///
/// These never indicate bad input data, only a bug in the serialization
/// sequence; they are fatal to the recording session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// A scalar, key, or scope operation was attempted with no document open
    #[error("No document open")]
    NoDocument,

    /// An operation was attempted after the root scope was already closed
    #[error("Document already complete")]
    DocumentComplete,

    /// A key was written outside an object scope
    #[error("Key written outside an object scope")]
    KeyOutsideObject,

    /// A key was written, or a scope closed, while a previous key still
    /// awaits its value
    #[error("Key written without a following value")]
    DanglingKey,

    /// A value was written directly into an object scope without a key
    #[error("Value written in an object scope without a key")]
    ValueWithoutKey,

    /// A scope was closed with the wrong close operation
    #[error("Scope close does not match the open scope")]
    ScopeMismatch,

    /// A flush was requested for a structurally incomplete document
    #[error("Flush of an incomplete document")]
    IncompleteDocument,
}
