//! Prefix code tables and their builders.
//!
//! A [`CodeTable`] maps each symbol of an alphabet to a non-empty codeword.
//! Every table produced here is prefix-free; the one exception permitted by
//! construction is a single-symbol alphabet, which maps to `"0"` and is
//! trivially prefix-free.
//!
//! Builders:
//! - [`fixed`]: `ceil(log2 M)`-bit sequential codes
//! - [`huffman`]: minimum-redundancy merge with oldest-first tie breaking
//! - [`fano`]: recursive Shannon-Fano median split
//!
//! [`codec`] encodes and decodes symbol sequences with any table.

pub mod codec;
pub mod fano;
pub mod fixed;
pub mod huffman;

pub use codec::{decode_with_table, encode_with_table, Decoded};
pub use fano::build_fano_code;
pub use fixed::{build_fixed_code, fixed_code_width};
pub use huffman::build_huffman_code;

use crate::bitio::BitString;
use crate::error::{Error, Result};
use crate::model::{Pmf, Symbol};

/// Symbol to codeword mapping.
///
/// Entries keep the order they were assigned in (alphabet order for fixed
/// codes, PMF order for Huffman, descending probability for Shannon-Fano).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S> {
    entries: Vec<(S, BitString)>,
}

impl<S: Symbol> CodeTable<S> {
    /// Build a table from explicit codewords, validating it.
    ///
    /// # Errors
    /// - `Error::EmptyInput` for an empty table
    /// - `Error::InvalidParameter` for an empty codeword, a repeated symbol,
    ///   or a codeword that is a prefix of another
    pub fn from_codes(entries: Vec<(S, BitString)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some((symbol, _)) = entries.iter().find(|(_, code)| code.is_empty()) {
            return Err(Error::InvalidParameter(format!(
                "empty codeword for {symbol:?}"
            )));
        }
        for (i, (a, _)) in entries.iter().enumerate() {
            if entries[i + 1..].iter().any(|(b, _)| a == b) {
                return Err(Error::InvalidParameter(format!(
                    "symbol {a:?} listed twice"
                )));
            }
        }

        let table = Self { entries };
        if let Some((a, b)) = table.prefix_violation() {
            return Err(Error::InvalidParameter(format!(
                "codeword for {a:?} is a prefix of the codeword for {b:?}"
            )));
        }
        Ok(table)
    }

    /// Builders construct tables that are prefix-free by construction.
    pub(crate) fn from_trusted(entries: Vec<(S, BitString)>) -> Self {
        debug_assert!(!entries.is_empty());
        Self { entries }
    }

    /// Codeword for `symbol`.
    pub fn code(&self, symbol: &S) -> Option<&BitString> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, code)| code)
    }

    /// `(symbol, codeword)` pairs in assignment order.
    pub fn entries(&self) -> &[(S, BitString)] {
        &self.entries
    }

    /// Number of symbols in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest codeword length.
    pub fn max_length(&self) -> usize {
        self.entries.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Average code length `L = sum len(code[s]) * p[s]` under `pmf`.
    ///
    /// # Errors
    /// Returns `Error::UnknownSymbol` if a PMF symbol has no codeword.
    pub fn average_length(&self, pmf: &Pmf<S>) -> Result<f64> {
        pmf.entries().iter().try_fold(0.0, |acc, entry| {
            let code = self
                .code(&entry.symbol)
                .ok_or_else(|| Error::unknown_symbol(&entry.symbol))?;
            Ok(acc + code.len() as f64 * entry.probability)
        })
    }

    /// Kraft sum `sum 2^-len(code[s])`; at most 1 for any prefix code.
    pub fn kraft_sum(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, code)| 2f64.powi(-(code.len() as i32)))
            .sum()
    }

    /// True if no codeword is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.prefix_violation().is_none()
    }

    fn prefix_violation(&self) -> Option<(&S, &S)> {
        for (i, (a, code_a)) in self.entries.iter().enumerate() {
            for (j, (b, code_b)) in self.entries.iter().enumerate() {
                if i != j && code_a.is_prefix_of(code_b) {
                    return Some((a, b));
                }
            }
        }
        None
    }
}

/// Coding efficiency `H / L`, as a fraction (1.0 = optimal).
pub fn efficiency(entropy: f64, average_length: f64) -> f64 {
    if average_length == 0.0 {
        0.0
    } else {
        entropy / average_length
    }
}
