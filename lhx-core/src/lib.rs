//! # lhx Core
//!
//! Core components for the lhx decompression library.
//!
//! This crate provides the format-independent building blocks the LH5/LH7
//! codec is assembled from:
//!
//! - [`bitstream`]: MSB-first bit-level I/O with a single-byte refill
//!   contract
//! - [`ringbuffer`]: history (sliding window) buffer for LZ77 back-references
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Container (external)                                │
//! │     ARJ/LHA archive headers, volume handling            │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec (lhx-codec)                                   │
//! │     Prefix-code trees, block decoder, async driver      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                             │
//! │     BitReader/BitWriter, HistoryBuffer, errors          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lhx_core::bitstream::BitReader;
//! use std::io::Cursor;
//!
//! let data = vec![0xAB, 0xCD];
//! let mut reader = BitReader::new(Cursor::new(data));
//! assert_eq!(reader.read_bits(12).unwrap(), 0xABC);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod ringbuffer;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use error::{LhxError, Result};
pub use ringbuffer::HistoryBuffer;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::error::{LhxError, Result};
    pub use crate::ringbuffer::HistoryBuffer;
}
