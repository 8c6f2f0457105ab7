//! Bit-level I/O for the LH5/LH7 codec.
//!
//! This module provides `BitReader` and `BitWriter` for reading and writing
//! data at the bit level, which is essential for the variable-length
//! canonical prefix codes used by the format.
//!
//! # Bit Ordering
//!
//! The ARJ/LHA family packs bits MSB-first: the most significant bit of each
//! byte is the first bit of the stream. Multi-bit fields are assembled by
//! shifting previous bits left and appending the next bit in the low
//! position.
//!
//! # Refill contract
//!
//! `BitReader` buffers at most one byte and pulls from the source exactly one
//! byte at a time, only when the buffer runs dry. That single-byte refill is
//! the codec's only well-defined suspension point; nothing else in the
//! decode path touches the source.
//!
//! # Example
//!
//! ```
//! use lhx_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut output);
//!     writer.write_bits(0b101, 3).unwrap();
//!     writer.write_bits(0b1100, 4).unwrap();
//!     writer.flush().unwrap();
//! }
//!
//! let mut reader = BitReader::new(Cursor::new(&output));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{LhxError, Result};
use std::io::{Read, Write};

/// An MSB-first bit reader that wraps any `Read` implementation.
///
/// Holds a single buffered byte plus a count of its still-valid bits. The
/// count is always in `0..=8`; a read either consumes buffered bits or pulls
/// exactly one new byte from the source.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// The buffered byte, left-aligned (next bit is the MSB).
    buffer: u8,
    /// Number of valid bits remaining in `buffer`.
    bits_in_buffer: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume this `BitReader` and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Get the total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Pull one byte from the source into the empty bit buffer.
    ///
    /// Fails with [`LhxError::TruncatedInput`] if the source yields no more
    /// bytes while a bit is still needed.
    fn refill(&mut self) -> Result<()> {
        debug_assert_eq!(self.bits_in_buffer, 0);

        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Err(LhxError::truncated(self.total_bits_read)),
                Ok(_) => break,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        self.buffer = byte[0];
        self.bits_in_buffer = 8;
        Ok(())
    }

    /// Read a single bit, MSB of the buffered byte first.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u32> {
        if self.bits_in_buffer == 0 {
            self.refill()?;
        }

        let bit = (self.buffer >> 7) as u32;
        self.buffer <<= 1;
        self.bits_in_buffer -= 1;
        self.total_bits_read += 1;

        Ok(bit)
    }

    /// Read up to 32 bits, assembled MSB-first.
    ///
    /// `read_bits(0)` returns 0 without touching the source.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        let mut result = 0u32;
        for _ in 0..count {
            result = (result << 1) | self.read_bit()?;
        }
        Ok(result)
    }
}

/// An MSB-first bit writer that wraps any `Write` implementation.
///
/// `BitWriter` accumulates bits into the high end of a byte and flushes each
/// completed byte to the underlying writer. Call `flush()` when done to
/// zero-pad and emit any partial byte.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Byte under construction, filled from the MSB down.
    buffer: u8,
    /// Number of bits already placed in `buffer`.
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_written: 0,
        }
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: u32) -> Result<()> {
        self.buffer |= ((bit & 1) as u8) << (7 - self.bits_in_buffer);
        self.bits_in_buffer += 1;
        self.total_bits_written += 1;

        if self.bits_in_buffer == 8 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
        Ok(())
    }

    /// Write up to 32 bits, most significant of `value`'s low `count` bits
    /// first.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1)?;
        }
        Ok(())
    }

    /// Zero-pad to a byte boundary and flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        if self.bits_in_buffer > 0 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Consume this `BitWriter`, flushing, and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        let this = std::mem::ManuallyDrop::new(self);
        // SAFETY: self is consumed and Drop is suppressed, so the writer can
        // be moved out.
        Ok(unsafe { std::ptr::read(&this.writer) })
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        // Best-effort flush on drop
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_bitreader_msb_first() {
        // 0b10110101 = 0xB5
        let data = vec![0xB5];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bit().unwrap(), 1); // MSB first
        assert_eq!(reader.read_bit().unwrap(), 0);
        assert_eq!(reader.read_bit().unwrap(), 1);
        assert_eq!(reader.read_bit().unwrap(), 1);
        assert_eq!(reader.read_bit().unwrap(), 0);
        assert_eq!(reader.read_bit().unwrap(), 1);
        assert_eq!(reader.read_bit().unwrap(), 0);
        assert_eq!(reader.read_bit().unwrap(), 1);
    }

    #[test]
    fn test_bitreader_multi_byte() {
        let data = vec![0xFF, 0x00];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(4).unwrap(), 0xF);
        assert_eq!(reader.read_bits(8).unwrap(), 0xF0); // Crosses byte boundary
        assert_eq!(reader.read_bits(4).unwrap(), 0x0);
    }

    #[test]
    fn test_bitreader_full_32() {
        let data = vec![0x12, 0x34, 0x56, 0x78];
        let mut reader = BitReader::new(Cursor::new(data));
        assert_eq!(reader.read_bits(32).unwrap(), 0x12345678);
    }

    #[test]
    fn test_bitreader_zero_bits_consumes_nothing() {
        let data = vec![0xAB];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(0).unwrap(), 0);
        assert_eq!(reader.bits_read(), 0);
        assert_eq!(reader.read_bits(8).unwrap(), 0xAB);
    }

    #[test]
    fn test_bitreader_truncated() {
        let data = vec![0xFF];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
        assert!(matches!(
            reader.read_bit(),
            Err(LhxError::TruncatedInput { bit_position: 8 })
        ));
    }

    #[test]
    fn test_bitreader_one_byte_at_a_time() {
        // The reader must not pull the second byte until all eight bits of
        // the first are consumed.
        let data = vec![0xAA, 0x55];
        let mut cursor = Cursor::new(data);
        let mut reader = BitReader::new(&mut cursor);

        reader.read_bits(8).unwrap();
        assert_eq!(reader.get_ref().position(), 1);
        reader.read_bit().unwrap();
        assert_eq!(reader.get_ref().position(), 2);
    }

    #[test]
    fn test_bitwriter_basic() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            // Write 0b10110101 bit by bit
            for bit in [1, 0, 1, 1, 0, 1, 0, 1] {
                writer.write_bit(bit).unwrap();
            }
            writer.flush().unwrap();
        }
        assert_eq!(output, vec![0xB5]);
    }

    #[test]
    fn test_bitwriter_pads_with_zeros() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            writer.write_bits(0b101, 3).unwrap();
            writer.flush().unwrap();
        }
        // 101 followed by five zero pad bits
        assert_eq!(output, vec![0b1010_0000]);
    }

    #[test]
    fn test_roundtrip() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            writer.write_bits(0b101, 3).unwrap();
            writer.write_bits(0b1111, 4).unwrap();
            writer.write_bits(0b10, 2).unwrap();
            writer.write_bits(0b110011, 6).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(Cursor::new(&output));
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1111);
        assert_eq!(reader.read_bits(2).unwrap(), 0b10);
        assert_eq!(reader.read_bits(6).unwrap(), 0b110011);
    }
}
