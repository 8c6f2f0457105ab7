//! The LH5/LH7 block decoder.
//!
//! A decode session owns a bit reader over the compressed source, a history
//! window sized by the configuration, and the trees of the block currently
//! being decoded. Output is pulled through caller-sized buffers; a
//! back-reference longer than the remaining buffer space is split and
//! resumed on the next call without re-reading any bits.

use crate::config::DecoderConfig;
use crate::config::constants::MIN_MATCH;
use crate::huffman::{PrefixCodeTree, read_command_tree, read_offset_tree, read_temp_tree};
use lhx_core::error::{LhxError, Result};
use lhx_core::{BitReader, HistoryBuffer};
use std::io::Read;

/// The trees of the block currently being decoded.
#[derive(Debug)]
struct BlockTrees {
    command: PrefixCodeTree,
    offset: PrefixCodeTree,
}

/// A back-reference copy split across `fill` calls.
#[derive(Debug, Clone, Copy)]
struct PendingCopy {
    offset: usize,
    remaining: usize,
}

/// Streaming LH5/LH7 decoder over any byte source.
///
/// One instance is one decode session: it is handed the source positioned at
/// the start of the compressed data, the configuration preset, and the
/// declared decompressed size, and produces exactly that many bytes through
/// [`fill`](Self::fill) (or the [`Read`] impl). All errors are fatal; a
/// failed session yields no further output.
#[derive(Debug)]
pub struct LhDecoder<R: Read> {
    /// Bit-level cursor over the compressed source.
    bits: BitReader<R>,
    /// Sliding window of produced output.
    history: HistoryBuffer,
    /// Session configuration.
    config: DecoderConfig,
    /// Declared total output size.
    output_size: u64,
    /// Bytes produced so far.
    produced: u64,
    /// Commands remaining in the current block.
    commands_left: u32,
    /// Trees of the current block; `None` before the first block.
    trees: Option<BlockTrees>,
    /// Partially emitted back-reference, if any.
    pending: Option<PendingCopy>,
    /// Set once any error has been surfaced.
    poisoned: bool,
}

impl<R: Read> LhDecoder<R> {
    /// Create a decode session over `reader`, which must be positioned at
    /// the first byte of compressed data.
    pub fn new(reader: R, config: DecoderConfig, output_size: u64) -> Self {
        Self {
            bits: BitReader::new(reader),
            history: HistoryBuffer::new(config.window_size()),
            config,
            output_size,
            produced: 0,
            commands_left: 0,
            trees: None,
            pending: None,
            poisoned: false,
        }
    }

    /// Bytes produced so far.
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// The declared total output size.
    pub fn output_size(&self) -> u64 {
        self.output_size
    }

    /// Whether the session has produced its full declared output.
    pub fn is_finished(&self) -> bool {
        self.produced >= self.output_size
    }

    /// Consume the decoder and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.bits.into_inner()
    }

    /// Decode into `buf`, returning the number of bytes written; 0 signals
    /// that the declared output size has been reached.
    ///
    /// Errors are fatal to the session: after any `Err`, every later call
    /// fails without producing output.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.poisoned {
            return Err(LhxError::corrupted("decode session previously failed"));
        }
        match self.fill_inner(buf) {
            Ok(n) => Ok(n),
            Err(e) => {
                self.poisoned = true;
                Err(e)
            }
        }
    }

    fn fill_inner(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut n = 0usize;

        while n < buf.len() && self.produced < self.output_size {
            // Drain an in-progress copy before decoding anything new.
            if let Some(mut copy) = self.pending.take() {
                let space = buf.len() - n;
                let owed = (self.output_size - self.produced) as usize;
                let take = copy.remaining.min(space).min(owed);

                self.history.copy(copy.offset, take, &mut buf[n..n + take])?;
                n += take;
                self.produced += take as u64;
                copy.remaining -= take;

                // A copy cut short by the declared size is abandoned, not an
                // error; one cut short by the buffer resumes next call.
                if copy.remaining > 0 && self.produced < self.output_size {
                    self.pending = Some(copy);
                }
                continue;
            }

            if self.commands_left == 0 {
                // Zero-command blocks are legal and not terminal; the loop
                // simply reads the next block header.
                self.begin_block()?;
                continue;
            }

            self.commands_left -= 1;
            let Some(trees) = self.trees.as_ref() else {
                return Err(LhxError::corrupted("block trees missing"));
            };

            let symbol = trees.command.decode(&mut self.bits)?;
            if symbol < 256 {
                let byte = symbol as u8;
                self.history.push(byte);
                buf[n] = byte;
                n += 1;
                self.produced += 1;
            } else {
                let length = (symbol - 256 + MIN_MATCH) as usize;

                let b = trees.offset.decode(&mut self.bits)?;
                let offset = if b <= 1 {
                    b as usize
                } else {
                    (self.bits.read_bits((b - 1) as u8)? | (1u32 << (b - 1))) as usize
                };

                if offset as u64 >= self.produced {
                    return Err(LhxError::invalid_back_reference(offset, self.produced));
                }

                self.pending = Some(PendingCopy {
                    offset,
                    remaining: length,
                });
            }
        }

        Ok(n)
    }

    /// Read a block header: 16-bit command count followed by the three tree
    /// specs (temp, command, offset — in that order).
    fn begin_block(&mut self) -> Result<()> {
        self.commands_left = self.bits.read_bits(16)?;

        let temp = read_temp_tree(&mut self.bits)?;
        let command = read_command_tree(&mut self.bits, &temp)?;
        let offset = read_offset_tree(&mut self.bits, &self.config)?;
        self.trees = Some(BlockTrees { command, offset });

        Ok(())
    }
}

impl<R: Read> Read for LhDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.fill(buf).map_err(Into::into)
    }
}

/// Decode a whole stream into a `Vec`.
///
/// Convenience wrapper over [`LhDecoder`] for sources that are already fully
/// in memory (or cheap to read synchronously).
pub fn decode_to_vec<R: Read>(
    reader: R,
    config: DecoderConfig,
    output_size: u64,
) -> Result<Vec<u8>> {
    let mut decoder = LhDecoder::new(reader, config, output_size);
    let mut out = vec![0u8; output_size as usize];
    let mut n = 0;

    while n < out.len() {
        let got = decoder.fill(&mut out[n..])?;
        if got == 0 {
            break;
        }
        n += got;
    }

    out.truncate(n);
    Ok(out)
}
