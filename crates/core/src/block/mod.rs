//! Linear block channel codes.
//!
//! Every code maps `k` message bits to an `n`-bit codeword and back. The
//! channel simulator only sees the [`BlockCode`] trait, so coded and uncoded
//! runs share one pipeline.

pub mod hamming;
pub mod repetition;

pub use hamming::{
    hamming_decode, hamming_encode, HammingCode, HammingVariant, HAMMING_15_11, HAMMING_7_4,
};
pub use repetition::{repetition_decode, repetition_encode, RepetitionCode};

use crate::bitio::BitString;
use crate::error::{Error, Result};
use std::fmt;

/// A block code with `k` message bits per `n`-bit codeword.
pub trait BlockCode: fmt::Debug + Send + Sync {
    /// Human-readable name, e.g. `"Hamming(7,4)"`.
    fn name(&self) -> String;

    /// Message bits per block (k).
    fn message_len(&self) -> usize;

    /// Codeword bits per block (n).
    fn block_len(&self) -> usize;

    /// Encode a message whose length is a multiple of `k`.
    fn encode(&self, bits: &[bool]) -> Result<BitString>;

    /// Decode a received word whose length is a multiple of `n`.
    fn decode(&self, bits: &[bool]) -> Result<BitString>;

    /// Code rate k/n.
    fn rate(&self) -> f64 {
        self.message_len() as f64 / self.block_len() as f64
    }
}

/// Fail with `Error::InvalidLength` unless `length` splits into whole blocks.
pub(crate) fn ensure_whole_blocks(length: usize, block: usize) -> Result<()> {
    if length % block != 0 {
        return Err(Error::InvalidLength { length, block });
    }
    Ok(())
}

/// Channel coding options offered by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodingScheme {
    Uncoded,
    Repetition3,
    Repetition5,
    Hamming74,
    Hamming1511,
}

impl CodingScheme {
    /// All schemes, uncoded first.
    pub const ALL: [CodingScheme; 5] = [
        CodingScheme::Uncoded,
        CodingScheme::Repetition3,
        CodingScheme::Repetition5,
        CodingScheme::Hamming74,
        CodingScheme::Hamming1511,
    ];

    /// The block code, or `None` for the uncoded baseline.
    pub fn code(self) -> Option<Box<dyn BlockCode>> {
        match self {
            CodingScheme::Uncoded => None,
            CodingScheme::Repetition3 => Some(Box::new(RepetitionCode::RATE_1_3)),
            CodingScheme::Repetition5 => Some(Box::new(RepetitionCode::RATE_1_5)),
            CodingScheme::Hamming74 => Some(Box::new(HAMMING_7_4)),
            CodingScheme::Hamming1511 => Some(Box::new(HAMMING_15_11)),
        }
    }

    /// `(k, n)` of the scheme; `(1, 1)` when uncoded.
    pub fn dimensions(self) -> (usize, usize) {
        self.code()
            .map_or((1, 1), |c| (c.message_len(), c.block_len()))
    }

    /// Short label used in reports and on the command line.
    pub fn label(self) -> &'static str {
        match self {
            CodingScheme::Uncoded => "uncoded",
            CodingScheme::Repetition3 => "rep3",
            CodingScheme::Repetition5 => "rep5",
            CodingScheme::Hamming74 => "ham74",
            CodingScheme::Hamming1511 => "ham1511",
        }
    }
}

impl std::str::FromStr for CodingScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CodingScheme::ALL
            .into_iter()
            .find(|scheme| scheme.label() == s.to_ascii_lowercase())
            .ok_or_else(|| Error::InvalidParameter(format!("unknown coding scheme: {s}")))
    }
}
