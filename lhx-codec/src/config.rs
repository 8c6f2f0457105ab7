//! Decoder configuration.
//!
//! The LH5 and LH7 variants differ only in two constants: the size of the
//! history window and the width of the offset-tree count field. They are a
//! configuration value, not a type hierarchy; construct a decoder with one
//! of the named presets (or a custom pair for experimentation).

/// Fixed per-session decoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// log2 of the history window size.
    pub history_bits: u8,
    /// Bit width of the offset-tree code count field.
    pub offset_bits: u8,
}

impl DecoderConfig {
    /// LH5: 2^14-byte window, 4-bit offset count field.
    pub const LH5: Self = Self {
        history_bits: 14,
        offset_bits: 4,
    };

    /// LH7: 2^17-byte window, 5-bit offset count field.
    pub const LH7: Self = Self {
        history_bits: 17,
        offset_bits: 5,
    };

    /// History window size in bytes.
    pub fn window_size(&self) -> usize {
        1usize << self.history_bits
    }

    /// Maximum number of offset codes a block may declare.
    pub fn max_offset_codes(&self) -> usize {
        self.history_bits as usize
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::LH5
    }
}

/// Format constants shared by both presets.
pub mod constants {
    /// Maximum number of temp-tree codes.
    pub const MAX_TEMP_CODES: usize = 20;
    /// Maximum number of command codes (256 literals + 254 match lengths).
    pub const MAX_COMMAND_CODES: usize = 510;
    /// Minimum match length; command symbol 256 encodes it.
    pub const MIN_MATCH: u16 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_windows() {
        assert_eq!(DecoderConfig::LH5.window_size(), 16384);
        assert_eq!(DecoderConfig::LH7.window_size(), 131072);
    }

    #[test]
    fn test_offset_code_limits() {
        assert_eq!(DecoderConfig::LH5.max_offset_codes(), 14);
        assert_eq!(DecoderConfig::LH7.max_offset_codes(), 17);
    }

    #[test]
    fn test_default_is_lh5() {
        assert_eq!(DecoderConfig::default(), DecoderConfig::LH5);
    }
}
