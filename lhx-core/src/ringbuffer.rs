//! History ring buffer (sliding window) for back-reference copies.
//!
//! The decoder keeps the most recently produced output in a power-of-two
//! circular buffer and resolves LZ77 back-references against it. The window
//! size is fixed per session: 2^14 bytes for LH5 streams, 2^17 for LH7.
//!
//! The buffer starts out filled with ASCII spaces, matching the historical
//! decoders for this format.

use crate::error::{LhxError, Result};

/// Fill byte for a fresh history buffer.
const FILL: u8 = b' ';

/// A circular byte buffer holding decompression history.
///
/// Back-reference offsets are 0-based: offset 0 is the most recently pushed
/// byte. An offset may only reach bytes the session has actually produced;
/// anything further back is a fatal [`LhxError::InvalidBackReference`].
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Current write position (next byte lands here).
    cursor: usize,
    /// Mask for cheap modulo (size - 1).
    mask: usize,
    /// Bytes pushed since construction or the last `clear`.
    pushed: u64,
}

impl HistoryBuffer {
    /// Create a new history buffer of the given size.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero or not a power of 2.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "History size must be greater than 0");
        assert!(
            size.is_power_of_two(),
            "History size must be a power of 2, got {}",
            size
        );

        Self {
            buffer: vec![FILL; size],
            cursor: 0,
            mask: size - 1,
            pushed: 0,
        }
    }

    /// Get the size of the buffer.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes pushed so far this session.
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    /// Reset the buffer to its freshly constructed state.
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.pushed = 0;
        self.buffer.fill(FILL);
    }

    /// Push a single byte of produced output into the history.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.cursor] = byte;
        self.cursor = (self.cursor + 1) & self.mask;
        self.pushed += 1;
    }

    /// Read the byte `offset` positions behind the cursor without mutating.
    ///
    /// Offset 0 is the most recently pushed byte.
    #[inline]
    pub fn peek_back(&self, offset: usize) -> u8 {
        let index = self
            .cursor
            .wrapping_sub((offset & self.mask) + 1)
            & self.mask;
        self.buffer[index]
    }

    /// Copy `count` bytes from `offset` positions back into `out`, pushing
    /// each byte back into the history as it is read.
    ///
    /// The write-through ordering is load-bearing: `offset < count` is legal
    /// and means the copy consumes bytes it is itself producing (run-length
    /// expansion). Each byte is re-pushed before the next one is read, so the
    /// relative offset stays fixed while the region slides forward. A bulk
    /// copy would break that.
    ///
    /// The caller must provide `out.len() >= count`. A resumable caller may
    /// split one logical copy across several invocations with the same
    /// `offset`; the semantics are identical to a single call.
    pub fn copy(&mut self, offset: usize, count: usize, out: &mut [u8]) -> Result<()> {
        debug_assert!(out.len() >= count);

        if offset as u64 >= self.pushed {
            return Err(LhxError::invalid_back_reference(offset, self.pushed));
        }

        for slot in out.iter_mut().take(count) {
            let byte = self.peek_back(offset);
            self.push(byte);
            *slot = byte;
        }

        Ok(())
    }
}
