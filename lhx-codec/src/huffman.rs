//! Canonical prefix-code trees and the per-block tree readers.
//!
//! Every block of an LH5/LH7 stream rebuilds three Huffman trees: a small
//! temp tree whose only job is to decode the command tree's own length
//! table, the command tree (literals and match lengths), and the offset tree
//! (back-reference distance extra-bit counts).
//!
//! The codes are canonical: the per-symbol bit lengths alone determine every
//! code, via a fixed breadth-first assignment order. [`PrefixCodeTree::from_lengths`]
//! reproduces that order exactly; tables that under- or over-subscribe the
//! code space are format errors, not best-effort inputs.

use crate::config::DecoderConfig;
use crate::config::constants::{MAX_COMMAND_CODES, MAX_TEMP_CODES};
use lhx_core::BitReader;
use lhx_core::error::{LhxError, Result};
use std::io::Read;

/// A node of the decode tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    /// Terminal node carrying a decoded symbol.
    Leaf(u16),
    /// Interior node; the children live at `child_base + bit`.
    Branch(u32),
}

/// Canonical Huffman decode tree.
///
/// Decoding walks from the root one bit per level until a leaf is reached.
/// The degenerate single-symbol code is a sole root leaf and consumes no
/// bits on decode.
#[derive(Debug, Clone)]
pub struct PrefixCodeTree {
    nodes: Vec<Node>,
}

impl PrefixCodeTree {
    /// Build the degenerate one-symbol tree.
    pub fn single(symbol: u16) -> Self {
        Self {
            nodes: vec![Node::Leaf(symbol)],
        }
    }

    /// Build a tree from a per-symbol code-length table.
    ///
    /// Construction is level by level. `allocated` tracks how many node
    /// slots the branch structure has reserved (the root counts as one).
    /// At each bit length L, every still-unmaterialized slot belonging to
    /// shorter codes becomes a branch reserving two children; then the
    /// symbols of length L are appended as leaves in ascending symbol
    /// order. That ordering is the format's canonical assignment rule —
    /// nothing is re-sorted by frequency.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut allocated: usize = 1;
        let mut level: u8 = 1;

        loop {
            let boundary = allocated;
            while nodes.len() < boundary {
                nodes.push(Node::Branch(allocated as u32));
                allocated += 2;
            }

            let mut more_leaves = false;
            for (symbol, &len) in lengths.iter().enumerate() {
                if len == level {
                    if nodes.len() >= allocated {
                        return Err(LhxError::oversubscribed_code(symbol as u16));
                    }
                    nodes.push(Node::Leaf(symbol as u16));
                } else if len > level {
                    more_leaves = true;
                }
            }

            if !more_leaves {
                break;
            }
            // Lengths are u8, so `len > level` cannot hold at level 255.
            level += 1;
        }

        if nodes.len() < allocated {
            return Err(LhxError::incomplete_code(nodes.len(), allocated));
        }

        Ok(Self { nodes })
    }

    /// Decode one symbol by walking from the root, one bit per branch.
    pub fn decode<R: Read>(&self, bits: &mut BitReader<R>) -> Result<u16> {
        let mut index = 0usize;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf(symbol)) => return Ok(*symbol),
                Some(Node::Branch(child_base)) => {
                    index = *child_base as usize + bits.read_bit()? as usize;
                }
                None => return Err(LhxError::corrupt_tree(index)),
            }
        }
    }

    #[cfg(test)]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Read one code length: 3 raw bits, then a unary extension while the value
/// is 7 (each additional 1-bit adds one). Overflowing 255 is fatal.
pub fn read_code_length<R: Read>(bits: &mut BitReader<R>) -> Result<u8> {
    let mut len = bits.read_bits(3)? as u16;
    if len == 7 {
        while bits.read_bit()? == 1 {
            len += 1;
            if len > 255 {
                return Err(LhxError::CodeLengthOverflow);
            }
        }
    }
    Ok(len as u8)
}

/// Read the temp tree spec: a 5-bit code count, a single raw symbol when the
/// count is zero, otherwise up to 20 code lengths with the 2-bit skip field
/// after the third slot.
pub fn read_temp_tree<R: Read>(bits: &mut BitReader<R>) -> Result<PrefixCodeTree> {
    let count = bits.read_bits(5)? as usize;
    if count > MAX_TEMP_CODES {
        return Err(LhxError::table_too_large("temp", count, MAX_TEMP_CODES));
    }
    if count == 0 {
        let symbol = bits.read_bits(5)? as u16;
        return Ok(PrefixCodeTree::single(symbol));
    }

    let mut lengths = [0u8; MAX_TEMP_CODES];
    let mut i = 0;
    while i < count {
        lengths[i] = read_code_length(bits)?;
        i += 1;
        if i == 3 {
            let skip = bits.read_bits(2)? as usize;
            if 3 + skip > count {
                return Err(LhxError::corrupted(format!(
                    "temp tree skip count {} exceeds {} declared codes",
                    skip, count
                )));
            }
            // The skipped slots keep length 0.
            i += skip;
        }
    }

    PrefixCodeTree::from_lengths(&lengths[..count])
}

/// Read the command tree spec: a 9-bit code count (510 max: 256 literals +
/// 254 match-length codes), a single raw symbol when zero, otherwise code
/// lengths decoded through the temp tree with its skip codes.
///
/// Temp symbols 0..=2 are skip codes advancing the length index by 1,
/// `3 + 4 extra bits`, or `20 + 9 extra bits` respectively; any other
/// symbol v writes length `v - 2`.
pub fn read_command_tree<R: Read>(
    bits: &mut BitReader<R>,
    temp: &PrefixCodeTree,
) -> Result<PrefixCodeTree> {
    let count = bits.read_bits(9)? as usize;
    if count > MAX_COMMAND_CODES {
        return Err(LhxError::table_too_large(
            "command",
            count,
            MAX_COMMAND_CODES,
        ));
    }
    if count == 0 {
        let symbol = bits.read_bits(9)? as u16;
        return Ok(PrefixCodeTree::single(symbol));
    }

    let mut lengths = vec![0u8; count];
    let mut i = 0;
    while i < count {
        let v = temp.decode(bits)?;
        match v {
            0 => i += 1,
            1 => i += 3 + bits.read_bits(4)? as usize,
            2 => i += 20 + bits.read_bits(9)? as usize,
            v => {
                lengths[i] = (v - 2) as u8;
                i += 1;
            }
        }
    }

    PrefixCodeTree::from_lengths(&lengths)
}

/// Read the offset tree spec: an `offset_bits`-wide code count, a single raw
/// symbol when zero, otherwise plain code lengths (no skip field). The
/// symbols are extra-bit counts, not raw offsets.
pub fn read_offset_tree<R: Read>(
    bits: &mut BitReader<R>,
    config: &DecoderConfig,
) -> Result<PrefixCodeTree> {
    let count = bits.read_bits(config.offset_bits)? as usize;
    let max = config.max_offset_codes();
    if count > max {
        return Err(LhxError::table_too_large("offset", count, max));
    }
    if count == 0 {
        let symbol = bits.read_bits(config.offset_bits)? as u16;
        return Ok(PrefixCodeTree::single(symbol));
    }

    let mut lengths = vec![0u8; count];
    for len in lengths.iter_mut() {
        *len = read_code_length(bits)?;
    }

    PrefixCodeTree::from_lengths(&lengths)
}
