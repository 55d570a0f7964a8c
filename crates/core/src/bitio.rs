//! Bit strings and MSB-first bit field I/O.
//!
//! Every codec in this crate produces and consumes a [`BitString`]: an owned
//! sequence of bits with a textual form of `'0'`/`'1'` characters. Fixed-width
//! integer fields (LZ78 pair packing, fixed-length codewords) are written and
//! read with [`BitWriter`] and [`BitReader`], both MSB-first.
//!
//! # Packing Rules
//! - `BitString::to_bytes` pads the final partial byte with trailing zeros
//! - `BitString::from_bytes` needs the exact bit count (padding is not
//!   distinguishable from data)
//!
//! # Example
//! ```
//! use infocode_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! let bits = writer.finish();
//! assert_eq!(bits.to_string(), "10111");
//!
//! let mut reader = BitReader::new(&bits);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! ```

use crate::error::{BitIoError, Error, Result};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Number of bits needed to index `count` distinct values: `ceil(log2(count))`.
///
/// Returns 0 for `count <= 1`.
pub fn ceil_log2(count: usize) -> usize {
    if count <= 1 {
        0
    } else {
        (usize::BITS - (count - 1).leading_zeros()) as usize
    }
}

/// An owned, growable sequence of bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    /// Create an empty bit string.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Create an empty bit string with room for `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append every bit of `other`.
    pub fn extend_from_bits(&mut self, other: &[bool]) {
        self.bits.extend_from_slice(other);
    }

    /// Return the bits as a slice.
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Consume the bit string and return its bits.
    pub fn into_vec(self) -> Vec<bool> {
        self.bits
    }

    /// Return true if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &BitString) -> bool {
        other.bits.starts_with(&self.bits)
    }

    /// Count positions where `self` and `other` differ, over the shorter length.
    pub fn hamming_distance(&self, other: &[bool]) -> usize {
        self.bits
            .iter()
            .zip(other.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Pack into bytes MSB-first, padding the final byte with zeros.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.bits.len().div_ceil(8));
        for chunk in self.bits.chunks(8) {
            let mut byte = 0u8;
            for (i, &bit) in chunk.iter().enumerate() {
                if bit {
                    byte |= 1 << (7 - i);
                }
            }
            bytes.push(byte);
        }
        bytes
    }

    /// Unpack `bit_len` bits MSB-first from `bytes`.
    ///
    /// # Errors
    /// Returns `BitIoError::UnexpectedEof` if `bytes` holds fewer than `bit_len` bits.
    pub fn from_bytes(bytes: &[u8], bit_len: usize) -> Result<Self> {
        if bit_len > bytes.len() * 8 {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let bits = (0..bit_len)
            .map(|i| bytes[i / 8] & (1 << (7 - i % 8)) != 0)
            .collect();
        Ok(Self { bits })
    }
}

impl Deref for BitString {
    type Target = [bool];

    fn deref(&self) -> &[bool] {
        &self.bits
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl From<&[bool]> for BitString {
    fn from(bits: &[bool]) -> Self {
        Self {
            bits: bits.to_vec(),
        }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BitString {
    type Item = &'a bool;
    type IntoIter = std::slice::Iter<'a, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.iter()
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .enumerate()
            .map(|(index, character)| match character {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(BitIoError::InvalidDigit { character, index }.into()),
            })
            .collect()
    }
}

/// Writes fixed-width fields MSB-first into a [`BitString`].
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bits: BitString,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self {
            bits: BitString::new(),
        }
    }

    /// Write the lowest `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        for shift in (0..count).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }

        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Return the total number of bits written.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Finish writing and return the output bits.
    pub fn finish(self) -> BitString {
        self.bits
    }
}

/// Reads fixed-width fields MSB-first from a bit slice.
///
/// # Invariants
/// - `position` never exceeds `bits.len()`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a [bool],
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader over the given bits.
    pub fn new(bits: &'a [bool]) -> Self {
        Self { bits, position: 0 }
    }

    /// Read `count` bits as an unsigned integer, most significant first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let field = &self.bits[self.position..self.position + count];
        self.position += count;
        Ok(field
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)))
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Return the number of bits remaining.
    pub fn bits_remaining(&self) -> usize {
        self.bits.len() - self.position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if every bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.position >= self.bits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(0), 0);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(64), 6);
        assert_eq!(ceil_log2(65), 7);
    }

    #[test]
    fn test_write_read_partial_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b11, 2).unwrap();
        writer.write_bits(0b000, 3).unwrap();

        let bits = writer.finish();
        assert_eq!(bits.to_string(), "10111000");

        let mut reader = BitReader::new(&bits);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(2).unwrap(), 0b11);
        assert_eq!(reader.read_bits(3).unwrap(), 0b000);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_past_end() {
        let bits: BitString = "1010".parse().unwrap();
        let mut reader = BitReader::new(&bits);

        assert_eq!(reader.read_bits(4).unwrap(), 0b1010);
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_zero_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFF, 0).unwrap();
        assert_eq!(writer.bit_len(), 0);

        let bits = BitString::new();
        let mut reader = BitReader::new(&bits);
        assert_eq!(reader.read_bits(0).unwrap(), 0);
    }

    #[test]
    fn test_64_bit_values() {
        let mut writer = BitWriter::new();
        let val = 0x123456789ABCDEF0u64;
        writer.write_bits(val, 64).unwrap();

        let bits = writer.finish();
        let mut reader = BitReader::new(&bits);
        assert_eq!(reader.read_bits(64).unwrap(), val);
    }

    #[test]
    fn test_invalid_bit_count() {
        let mut writer = BitWriter::new();
        assert!(writer.write_bits(0, 65).is_err());

        let bits = BitString::new();
        let mut reader = BitReader::new(&bits);
        assert!(matches!(
            reader.read_bits(65),
            Err(Error::BitIo(BitIoError::InvalidBitCount(65)))
        ));
    }

    #[test]
    fn test_parse_and_display() {
        let bits: BitString = "0110".parse().unwrap();
        assert_eq!(bits.as_slice(), &[false, true, true, false]);
        assert_eq!(bits.to_string(), "0110");

        let err = "01x0".parse::<BitString>().unwrap_err();
        assert!(matches!(
            err,
            Error::BitIo(BitIoError::InvalidDigit {
                character: 'x',
                index: 2
            })
        ));
    }

    #[test]
    fn test_byte_packing_pads_with_zeros() {
        let bits: BitString = "10111".parse().unwrap();
        let bytes = bits.to_bytes();
        assert_eq!(bytes, vec![0b10111000]);

        let unpacked = BitString::from_bytes(&bytes, 5).unwrap();
        assert_eq!(unpacked, bits);
        assert!(BitString::from_bytes(&bytes, 9).is_err());
    }

    #[test]
    fn test_prefix_and_distance() {
        let a: BitString = "10".parse().unwrap();
        let b: BitString = "101".parse().unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(a.is_prefix_of(&a));

        let c: BitString = "111".parse().unwrap();
        assert_eq!(b.hamming_distance(&c), 1);
    }
}
