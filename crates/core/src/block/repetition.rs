//! Repetition codes.
//!
//! Each bit is sent `k` times and recovered by majority vote, correcting up to
//! `(k - 1) / 2` flipped bits per block. For an even `k` a block with exactly
//! half ones decodes to 1.

use super::{ensure_whole_blocks, BlockCode};
use crate::bitio::BitString;
use crate::error::{Error, Result};

/// Rate 1/k repetition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionCode {
    k: usize,
}

impl RepetitionCode {
    pub const RATE_1_3: RepetitionCode = RepetitionCode { k: 3 };
    pub const RATE_1_5: RepetitionCode = RepetitionCode { k: 5 };

    /// Repetition code with `k` copies per bit.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` if `k` is zero.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidParameter(
                "repetition factor must be at least 1".to_string(),
            ));
        }
        Ok(Self { k })
    }

    /// Copies per bit.
    pub fn factor(&self) -> usize {
        self.k
    }

    /// Bit errors per block that are always corrected.
    pub fn correctable_errors(&self) -> usize {
        (self.k - 1) / 2
    }
}

impl BlockCode for RepetitionCode {
    fn name(&self) -> String {
        format!("Repetition(1/{})", self.k)
    }

    fn message_len(&self) -> usize {
        1
    }

    fn block_len(&self) -> usize {
        self.k
    }

    fn encode(&self, bits: &[bool]) -> Result<BitString> {
        Ok(bits
            .iter()
            .flat_map(|&bit| std::iter::repeat(bit).take(self.k))
            .collect())
    }

    fn decode(&self, bits: &[bool]) -> Result<BitString> {
        ensure_whole_blocks(bits.len(), self.k)?;
        Ok(bits
            .chunks(self.k)
            .map(|block| 2 * block.iter().filter(|&&b| b).count() >= self.k)
            .collect())
    }
}

/// Repeat every bit `k` times.
pub fn repetition_encode(bits: &[bool], k: usize) -> Result<BitString> {
    RepetitionCode::new(k)?.encode(bits)
}

/// Majority-vote decode of `k`-bit blocks.
pub fn repetition_decode(bits: &[bool], k: usize) -> Result<BitString> {
    RepetitionCode::new(k)?.decode(bits)
}
