use std::io;

use thiserror::Error;

use crate::word::Word;

/// Errors raised while feeding keys into a [`Builder`](crate::Builder).
///
/// All of them are reported before any mutation is committed, so the
/// builder stays usable after an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The key sorts before the previously accepted one. Keys must
    /// arrive in the crate's total order (lexicographic, longer prefix
    /// first).
    #[error("key {input:?} is out of order: it sorts before {previous:?}")]
    OrderViolation { previous: Word, input: Word },

    /// The automaton is already finalized; no further keys are accepted.
    #[error("automaton is already finalized")]
    Finalized,

    /// The key contains one of the reserved bytes `0x00` or `0xFF`.
    #[error("key contains reserved byte 0x{0:02x}")]
    ReservedByte(u8),
}

/// Errors raised by the compact automaton: probing with reserved bytes,
/// and reading or writing `.fsa` files.
#[derive(Debug, Error)]
pub enum FsaError {
    /// A probe sequence contains one of the reserved bytes `0x00` or
    /// `0xFF`. The cursor is left untouched.
    #[error("probe contains reserved byte 0x{0:02x}")]
    ReservedByte(u8),

    /// The file is not a serialized automaton, or its header fails
    /// validation.
    #[error("invalid automaton file: {0}")]
    InvalidFile(&'static str),

    /// An underlying file operation failed.
    #[error("i/o error")]
    Io(#[from] io::Error),
}
