//! # lhx-codec
//!
//! Decoder for the LH5/LH7 family of LZ77 + canonical-Huffman streams, as
//! used by ARJ and LHA style archives.
//!
//! Each stream is a sequence of blocks. A block carries a 16-bit command
//! count and three canonical prefix code trees (a temp tree used only to
//! deliver the command tree's code lengths, the command tree itself, and an
//! offset tree), followed by that many commands. A command is either a
//! literal byte or a back-reference into a sliding history window.
//!
//! Two presets are provided:
//!
//! - **LH5**: 16KB window, 4-bit offset-tree header (ARJ method 1-3 / LHA lh5)
//! - **LH7**: 128KB window, 5-bit offset-tree header (LHA lh7)
//!
//! ## Example
//!
//! ```rust
//! use lhx_codec::{DecoderConfig, LhDecoder};
//! use std::io::Read;
//!
//! fn unpack(compressed: &[u8], unpacked_size: u64) -> std::io::Result<Vec<u8>> {
//!     let mut decoder = LhDecoder::new(compressed, DecoderConfig::LH5, unpacked_size);
//!     let mut out = Vec::new();
//!     decoder.read_to_end(&mut out)?;
//!     Ok(out)
//! }
//! ```
//!
//! ## Async
//!
//! With the `async-io` feature, [`AsyncLhDecoder`](async_io::AsyncLhDecoder)
//! wraps the same decoder in a blocking worker task and exposes it as a
//! [`tokio::io::AsyncRead`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decode;
pub mod huffman;

#[cfg(feature = "async-io")]
pub mod async_io;

// Re-exports
pub use config::DecoderConfig;
pub use decode::{LhDecoder, decode_to_vec};
pub use huffman::PrefixCodeTree;

#[cfg(feature = "async-io")]
pub use async_io::AsyncLhDecoder;
