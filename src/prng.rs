//! Deterministic seed stream for fountain codewords.
//!
//! The stream is a Galois linear feedback shift register.  Each step shifts
//! the state left by one bit and, when the bit shifted past the register
//! width is set, XORs in the feedback polynomial.  With a primitive
//! polynomial the register visits every non-zero state exactly once before
//! repeating, so the encoder never hands out the same seed twice within a
//! period and the decoder needs nothing but the seed embedded in each
//! codeword header.

use crate::error::ConfigError;

/// Feedback polynomial `x^32 + x^7 + x^6 + x^2 + 1`.
pub const DEFAULT_POLY: u64 = 0b1_0000_0000_0000_0000_0000_0000_1100_0101;

/// Initial register state.
pub const DEFAULT_STATE: u64 = 0b0_0101_0101;

/// A Galois LFSR producing a non-repeating stream of seeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lfsr {
    state: u64,
    poly: u64,
    width: u32,
}

impl Lfsr {
    /// Creates a register from an initial state and a feedback polynomial.
    ///
    /// The polynomial's highest set bit defines the register width, which
    /// must be between 2 and 63 bits.  The state must be non-zero and fit
    /// inside the register.
    pub fn new(state: u64, poly: u64) -> Result<Self, ConfigError> {
        if poly < 0b100 {
            return Err(ConfigError::invalid(
                "lfsr_poly",
                "polynomial must have degree of at least 2",
            ));
        }
        let width = 63 - poly.leading_zeros();
        if state == 0 || state >> width != 0 {
            return Err(ConfigError::invalid(
                "lfsr_state",
                format!("state must be non-zero and below 2^{width}"),
            ));
        }
        Ok(Self { state, poly, width })
    }

    /// Register width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of distinct seeds produced before the stream cycles, assuming
    /// a primitive polynomial.
    pub fn period(&self) -> u64 {
        (1u64 << self.width) - 1
    }

    /// Advances the register and returns the new state.
    #[inline]
    pub fn next_seed(&mut self) -> u64 {
        self.state <<= 1;
        if self.state >> self.width != 0 {
            self.state ^= self.poly;
        }
        self.state
    }
}

impl Default for Lfsr {
    fn default() -> Self {
        Self {
            state: DEFAULT_STATE,
            poly: DEFAULT_POLY,
            width: 32,
        }
    }
}

impl Iterator for Lfsr {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_seed())
    }
}
