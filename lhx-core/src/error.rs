//! Error types for lhx operations.
//!
//! Every error in this taxonomy is fatal to the decode session that raised
//! it: the session is abandoned, no retry is attempted, and the error is
//! surfaced verbatim to the caller. Bytes already delivered by earlier
//! successful reads are never retracted.

use std::io;
use thiserror::Error;

/// The main error type for lhx operations.
#[derive(Debug, Error)]
pub enum LhxError {
    /// I/O error from the underlying reader.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The byte source was exhausted while more bits were needed.
    #[error("Truncated input: source exhausted at bit position {bit_position}")]
    TruncatedInput {
        /// Bit position at which the refill failed.
        bit_position: u64,
    },

    /// A code-length table sums to less than a complete canonical code.
    #[error("Incomplete prefix code: {nodes} nodes built, {allocated} slots reserved")]
    IncompleteCode {
        /// Nodes actually materialized.
        nodes: usize,
        /// Slots the branch structure had reserved.
        allocated: usize,
    },

    /// A code-length table over-subscribes the canonical code space.
    #[error("Oversubscribed prefix code at symbol {symbol}")]
    OversubscribedCode {
        /// Symbol whose leaf did not fit.
        symbol: u16,
    },

    /// A branch pointed outside the node list during a tree walk.
    #[error("Corrupt prefix tree: child index {node} out of range")]
    CorruptTree {
        /// The out-of-range node index.
        node: usize,
    },

    /// A back-reference pointed past the bytes produced so far.
    #[error("Invalid back-reference: offset {offset} with only {produced} bytes produced")]
    InvalidBackReference {
        /// The offending 0-based offset.
        offset: usize,
        /// Bytes produced in the session when the reference was decoded.
        produced: u64,
    },

    /// A unary-extended code length grew past 255.
    #[error("Code length overflow: unary extension exceeded 255")]
    CodeLengthOverflow,

    /// A declared code count exceeds the format maximum for its table.
    #[error("{kind} table too large: {declared} codes declared, maximum {max}")]
    TableTooLarge {
        /// Which tree the count belongs to ("temp", "command", "offset").
        kind: &'static str,
        /// The declared code count.
        declared: usize,
        /// The format maximum for that tree.
        max: usize,
    },

    /// Residual format violations with no dedicated variant.
    #[error("Corrupted data: {message}")]
    CorruptedData {
        /// Description of the violation.
        message: String,
    },
}

/// Result type alias for lhx operations.
pub type Result<T> = std::result::Result<T, LhxError>;

impl LhxError {
    /// Create a truncated-input error.
    pub fn truncated(bit_position: u64) -> Self {
        Self::TruncatedInput { bit_position }
    }

    /// Create an incomplete-code error.
    pub fn incomplete_code(nodes: usize, allocated: usize) -> Self {
        Self::IncompleteCode { nodes, allocated }
    }

    /// Create an oversubscribed-code error.
    pub fn oversubscribed_code(symbol: u16) -> Self {
        Self::OversubscribedCode { symbol }
    }

    /// Create a corrupt-tree error.
    pub fn corrupt_tree(node: usize) -> Self {
        Self::CorruptTree { node }
    }

    /// Create an invalid back-reference error.
    pub fn invalid_back_reference(offset: usize, produced: u64) -> Self {
        Self::InvalidBackReference { offset, produced }
    }

    /// Create a table-too-large error.
    pub fn table_too_large(kind: &'static str, declared: usize, max: usize) -> Self {
        Self::TableTooLarge {
            kind,
            declared,
            max,
        }
    }

    /// Create a corrupted-data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::CorruptedData {
            message: message.into(),
        }
    }
}

impl From<LhxError> for io::Error {
    fn from(err: LhxError) -> Self {
        match err {
            LhxError::Io(e) => e,
            LhxError::TruncatedInput { .. } => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err)
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
