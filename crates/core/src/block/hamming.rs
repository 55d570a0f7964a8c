//! Systematic Hamming codes (7,4) and (15,11).
//!
//! Generator and parity-check matrices are compile-time constants over GF(2)
//! with `G = [I_k | P]` and `H = [Pᵀ | I_r]`. Decoding computes the syndrome
//! `s = H · r`, reads it as a binary number with row 0 as the most
//! significant bit, and flips the bit whose column of `H` equals `s`. A zero
//! syndrome flips nothing; so does a syndrome that matches no column.
//!
//! Any single bit error per block is corrected. Two or more errors in one
//! block are miscorrected silently.

use super::{ensure_whole_blocks, BlockCode};
use crate::bitio::BitString;
use crate::error::Result;

/// Hamming code with `K` message bits, `N` codeword bits and `R = N - K`
/// parity bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HammingCode<const K: usize, const N: usize, const R: usize> {
    generator: [[u8; N]; K],
    parity_check: [[u8; N]; R],
}

/// Hamming(7,4).
pub const HAMMING_7_4: HammingCode<4, 7, 3> = HammingCode {
    generator: [
        [1, 0, 0, 0, 1, 1, 0],
        [0, 1, 0, 0, 1, 0, 1],
        [0, 0, 1, 0, 0, 1, 1],
        [0, 0, 0, 1, 1, 1, 1],
    ],
    parity_check: [
        [1, 1, 0, 1, 1, 0, 0],
        [1, 0, 1, 1, 0, 1, 0],
        [0, 1, 1, 1, 0, 0, 1],
    ],
};

/// Hamming(15,11). The parity rows of `P` are the eleven distinct 4-bit
/// vectors of weight two or more.
pub const HAMMING_15_11: HammingCode<11, 15, 4> = HammingCode {
    generator: [
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 1],
        [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
        [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1],
        [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
        [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0],
        [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0],
        [0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 1, 1],
        [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 1, 0],
    ],
    parity_check: [
        [1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 1, 1, 0, 0, 0],
        [1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0],
        [0, 1, 1, 0, 1, 0, 1, 1, 0, 1, 1, 0, 0, 1, 0],
        [1, 1, 1, 1, 0, 0, 1, 0, 1, 1, 0, 0, 0, 0, 1],
    ],
};

/// The two Hamming variants offered by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HammingVariant {
    H7_4,
    H15_11,
}

impl HammingVariant {
    pub fn encode(self, bits: &[bool]) -> Result<BitString> {
        match self {
            HammingVariant::H7_4 => HAMMING_7_4.encode(bits),
            HammingVariant::H15_11 => HAMMING_15_11.encode(bits),
        }
    }

    pub fn decode(self, bits: &[bool]) -> Result<BitString> {
        match self {
            HammingVariant::H7_4 => HAMMING_7_4.decode(bits),
            HammingVariant::H15_11 => HAMMING_15_11.decode(bits),
        }
    }
}

/// Encode `bits` with the chosen Hamming variant.
pub fn hamming_encode(bits: &[bool], variant: HammingVariant) -> Result<BitString> {
    variant.encode(bits)
}

/// Decode and single-error-correct `bits` with the chosen Hamming variant.
pub fn hamming_decode(bits: &[bool], variant: HammingVariant) -> Result<BitString> {
    variant.decode(bits)
}

impl<const K: usize, const N: usize, const R: usize> HammingCode<K, N, R> {
    /// Codeword for one `K`-bit message block: `c_j = Σ m_i G_ij (mod 2)`.
    fn encode_block(&self, message: &[bool], out: &mut BitString) {
        for j in 0..N {
            let bit = message
                .iter()
                .zip(&self.generator)
                .fold(0u8, |acc, (&m, row)| acc ^ (u8::from(m) & row[j]));
            out.push(bit == 1);
        }
    }

    /// Syndrome of one `N`-bit block, row 0 as the most significant bit.
    pub fn syndrome(&self, block: &[bool]) -> usize {
        self.parity_check.iter().fold(0usize, |acc, row| {
            let parity = row
                .iter()
                .zip(block)
                .fold(0u8, |p, (&h, &r)| p ^ (h & u8::from(r)));
            (acc << 1) | usize::from(parity)
        })
    }

    /// Bit position whose column of `H` reads as `syndrome`.
    fn error_position(&self, syndrome: usize) -> Option<usize> {
        (0..N).find(|&j| {
            let column = self
                .parity_check
                .iter()
                .fold(0usize, |acc, row| (acc << 1) | usize::from(row[j]));
            column == syndrome
        })
    }

    /// Correct at most one bit of `block` in place. Returns the flipped
    /// position, if any.
    fn correct_block(&self, block: &mut [bool]) -> Option<usize> {
        let syndrome = self.syndrome(block);
        if syndrome == 0 {
            return None;
        }
        let position = self.error_position(syndrome)?;
        block[position] = !block[position];
        Some(position)
    }
}

impl<const K: usize, const N: usize, const R: usize> BlockCode for HammingCode<K, N, R> {
    fn name(&self) -> String {
        format!("Hamming({N},{K})")
    }

    fn message_len(&self) -> usize {
        K
    }

    fn block_len(&self) -> usize {
        N
    }

    fn encode(&self, bits: &[bool]) -> Result<BitString> {
        ensure_whole_blocks(bits.len(), K)?;
        let mut out = BitString::with_capacity(bits.len() / K * N);
        for message in bits.chunks(K) {
            self.encode_block(message, &mut out);
        }
        Ok(out)
    }

    fn decode(&self, bits: &[bool]) -> Result<BitString> {
        ensure_whole_blocks(bits.len(), N)?;
        let mut out = BitString::with_capacity(bits.len() / N * K);
        let mut corrected = 0usize;
        let mut block = [false; N];

        for received in bits.chunks(N) {
            block.copy_from_slice(received);
            if self.correct_block(&mut block).is_some() {
                corrected += 1;
            }
            out.extend_from_bits(&block[..K]);
        }

        tracing::trace!(
            code = %self.name(),
            blocks = bits.len() / N,
            corrected,
            "hamming decode"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    fn message(value: usize, k: usize) -> Vec<bool> {
        (0..k).rev().map(|i| (value >> i) & 1 == 1).collect()
    }

    fn assert_orthogonal<const K: usize, const N: usize, const R: usize>(
        code: &HammingCode<K, N, R>,
    ) {
        for g in &code.generator {
            for h in &code.parity_check {
                let dot = g.iter().zip(h).fold(0u8, |acc, (a, b)| acc ^ (a & b));
                assert_eq!(dot, 0, "G row {g:?} not orthogonal to H row {h:?}");
            }
        }
    }

    fn assert_corrects_every_single_error<const K: usize, const N: usize, const R: usize>(
        code: &HammingCode<K, N, R>,
    ) {
        for value in 0..(1usize << K) {
            let msg = message(value, K);
            let codeword = code.encode(&msg).unwrap();
            assert_eq!(code.syndrome(&codeword), 0);
            assert_eq!(code.decode(&codeword).unwrap().as_slice(), msg.as_slice());

            for flip in 0..N {
                let mut received = codeword.clone().into_vec();
                received[flip] = !received[flip];
                assert_eq!(
                    code.decode(&received).unwrap().as_slice(),
                    msg.as_slice(),
                    "message {value} with bit {flip} flipped"
                );
            }
        }
    }

    #[test]
    fn test_generator_parity_check_orthogonal() {
        assert_orthogonal(&HAMMING_7_4);
        assert_orthogonal(&HAMMING_15_11);
    }

    #[test]
    fn test_parity_check_columns_distinct_and_nonzero() {
        let mut seen: Vec<usize> = (1..16)
            .filter_map(|s| HAMMING_15_11.error_position(s))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..15).collect::<Vec<_>>());

        let mut seen: Vec<usize> = (1..8)
            .filter_map(|s| HAMMING_7_4.error_position(s))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_encode_7_4() {
        assert_eq!(HAMMING_7_4.encode(&bits("1011")).unwrap(), bits("1011010"));
        assert_eq!(HAMMING_7_4.encode(&bits("0000")).unwrap(), bits("0000000"));
    }

    #[test]
    fn test_syndrome_matches_column() {
        // error in position 0 -> first column of H = 110b
        let mut word = HAMMING_7_4.encode(&bits("0000")).unwrap().into_vec();
        word[0] = true;
        assert_eq!(HAMMING_7_4.syndrome(&word), 0b110);
    }

    #[test]
    fn test_7_4_corrects_every_single_error() {
        assert_corrects_every_single_error(&HAMMING_7_4);
    }

    #[test]
    fn test_15_11_corrects_every_single_error() {
        assert_corrects_every_single_error(&HAMMING_15_11);
    }

    #[test]
    fn test_double_error_miscorrects() {
        let msg = bits("1011");
        let mut word = HAMMING_7_4.encode(&msg).unwrap().into_vec();
        word[0] = !word[0];
        word[1] = !word[1];
        assert_ne!(HAMMING_7_4.decode(&word).unwrap(), msg);
    }

    #[test]
    fn test_multiple_blocks() {
        let msg = bits("10110001");
        let encoded = HAMMING_7_4.encode(&msg).unwrap();
        assert_eq!(encoded.len(), 14);
        assert_eq!(hamming_decode(&encoded, HammingVariant::H7_4).unwrap(), msg);
        assert_eq!(hamming_encode(&msg, HammingVariant::H7_4).unwrap(), encoded);
    }

    #[test]
    fn test_length_checks() {
        assert!(matches!(
            HAMMING_7_4.encode(&bits("101")),
            Err(Error::InvalidLength {
                length: 3,
                block: 4
            })
        ));
        assert!(matches!(
            HammingVariant::H15_11.decode(&bits("1010")),
            Err(Error::InvalidLength {
                length: 4,
                block: 15
            })
        ));
    }

    #[test]
    fn test_rates() {
        assert!((HAMMING_7_4.rate() - 4.0 / 7.0).abs() < 1e-12);
        assert_eq!(HAMMING_15_11.name(), "Hamming(15,11)");
    }
}
