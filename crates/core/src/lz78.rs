//! LZ78 dictionary coding.
//!
//! The encoder grows a phrase dictionary seeded with the empty phrase at code
//! 0. It extends the current phrase one symbol at a time; as soon as the
//! extension is not in the dictionary it emits `(code of the known prefix,
//! next symbol)`, stores the extension under the next sequential code and
//! starts a new phrase. If the input ends while the current phrase is still a
//! known entry, a final `(code, None)` pair carries it.
//!
//! The decoder replays the same growth rule, so both sides hold identical
//! dictionaries after every pair.
//!
//! # Binary Packing
//!
//! ```text
//! +------------------------+-------------------------+
//! | code (code_width bits) | symbol (symbol_width)   |   one per full pair
//! +------------------------+-------------------------+
//! | code (code_width bits) |                             trailing (code, None)
//! +------------------------+
//! ```
//!
//! `code_width = ceil(log2(dictionary_size + 1))` where `dictionary_size`
//! counts every entry including the empty phrase, and
//! `symbol_width = ceil(log2(alphabet_size))`; both are at least 1. Symbols are
//! written as their index in the sorted alphabet.

use crate::bitio::{ceil_log2, BitReader, BitString, BitWriter};
use crate::error::{Error, Result};
use crate::model::Symbol;
use std::collections::HashMap;

/// One emitted `(code, symbol)` pair; `symbol` is `None` only for the
/// trailing pair of an input that ends on a known phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lz78Pair<S> {
    pub code: usize,
    pub symbol: Option<S>,
}

/// Append-only phrase dictionary. Codes are dense indices; code 0 is the empty phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary<S> {
    phrases: Vec<Vec<S>>,
}

impl<S: Symbol> Dictionary<S> {
    fn new() -> Self {
        Self {
            phrases: vec![Vec::new()],
        }
    }

    /// Number of entries including the empty phrase.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always false: the empty phrase is always present.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Phrase stored under `code`.
    pub fn phrase(&self, code: usize) -> Option<&[S]> {
        self.phrases.get(code).map(Vec::as_slice)
    }

    /// All phrases indexed by code.
    pub fn phrases(&self) -> &[Vec<S>] {
        &self.phrases
    }

    /// Longest stored phrase (the first one on ties).
    pub fn longest_phrase(&self) -> &[S] {
        self.phrases
            .iter()
            .fold(&self.phrases[0], |best, p| if p.len() > best.len() { p } else { best })
    }

    fn push(&mut self, phrase: Vec<S>) -> usize {
        self.phrases.push(phrase);
        self.phrases.len() - 1
    }
}

/// Output of [`lz78_encode`].
#[derive(Debug, Clone)]
pub struct Lz78Encoding<S> {
    pub pairs: Vec<Lz78Pair<S>>,
    pub dictionary: Dictionary<S>,
}

/// Encode `symbols` into LZ78 pairs with a fresh dictionary.
pub fn lz78_encode<S: Symbol>(symbols: &[S]) -> Lz78Encoding<S> {
    let mut dictionary = Dictionary::new();
    let mut lookup: HashMap<Vec<S>, usize> = HashMap::new();
    lookup.insert(Vec::new(), 0);

    let mut pairs = Vec::new();
    let mut phrase: Vec<S> = Vec::new();
    let mut phrase_code = 0;

    for symbol in symbols {
        phrase.push(symbol.clone());
        match lookup.get(&phrase) {
            Some(&code) => phrase_code = code,
            None => {
                pairs.push(Lz78Pair {
                    code: phrase_code,
                    symbol: Some(symbol.clone()),
                });
                let finished = std::mem::take(&mut phrase);
                let code = dictionary.push(finished.clone());
                lookup.insert(finished, code);
                phrase_code = 0;
            }
        }
    }

    if !phrase.is_empty() {
        pairs.push(Lz78Pair {
            code: phrase_code,
            symbol: None,
        });
    }

    tracing::debug!(
        symbols = symbols.len(),
        pairs = pairs.len(),
        dictionary = dictionary.len(),
        "lz78 encode finished"
    );

    Lz78Encoding { pairs, dictionary }
}

/// Rebuild the symbol sequence from LZ78 pairs.
///
/// # Errors
/// Returns `Error::CorruptDictionary` if a pair references a code the decoder
/// has not built yet.
pub fn lz78_decode<S: Symbol>(pairs: &[Lz78Pair<S>]) -> Result<Vec<S>> {
    let mut dictionary = Dictionary::new();
    let mut out = Vec::new();

    for pair in pairs {
        let mut phrase = dictionary
            .phrase(pair.code)
            .ok_or(Error::CorruptDictionary {
                code: pair.code,
                dictionary_size: dictionary.len(),
            })?
            .to_vec();

        match &pair.symbol {
            Some(symbol) => {
                phrase.push(symbol.clone());
                out.extend_from_slice(&phrase);
                dictionary.push(phrase);
            }
            None => out.extend_from_slice(&phrase),
        }
    }

    Ok(out)
}

/// Bit-packed LZ78 stream plus the sizes the decoder needs to recompute the
/// field widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedLz78 {
    pub bits: BitString,
    pub dictionary_size: usize,
}

/// Width of the code field for a dictionary of `dictionary_size` entries.
pub fn code_width(dictionary_size: usize) -> usize {
    ceil_log2(dictionary_size + 1).max(1)
}

/// Width of the symbol field for an alphabet of `alphabet_size` symbols.
pub fn symbol_width(alphabet_size: usize) -> usize {
    ceil_log2(alphabet_size).max(1)
}

/// Serialize pairs with fixed-width fields.
///
/// `alphabet` must be sorted; symbols are written as their index in it.
///
/// # Errors
/// Returns `Error::UnknownSymbol` for a symbol outside `alphabet`.
pub fn lz78_pack<S: Symbol>(
    encoding: &Lz78Encoding<S>,
    alphabet: &[S],
) -> Result<PackedLz78> {
    let dictionary_size = encoding.dictionary.len();
    let code_bits = code_width(dictionary_size);
    let symbol_bits = symbol_width(alphabet.len());

    let mut writer = BitWriter::new();
    for pair in &encoding.pairs {
        writer.write_bits(pair.code as u64, code_bits)?;
        if let Some(symbol) = &pair.symbol {
            let index = alphabet
                .binary_search(symbol)
                .map_err(|_| Error::unknown_symbol(symbol))?;
            writer.write_bits(index as u64, symbol_bits)?;
        }
    }

    Ok(PackedLz78 {
        bits: writer.finish(),
        dictionary_size,
    })
}

/// Parse a packed stream back into pairs.
///
/// A remainder of exactly one code field is the trailing `(code, None)` pair.
///
/// # Errors
/// - `Error::InvalidLength` if the stream does not split into whole fields
/// - `Error::UnknownSymbol` for a symbol index outside `alphabet`
pub fn lz78_unpack<S: Symbol>(packed: &PackedLz78, alphabet: &[S]) -> Result<Vec<Lz78Pair<S>>> {
    let code_bits = code_width(packed.dictionary_size);
    let symbol_bits = symbol_width(alphabet.len());
    let pair_bits = code_bits + symbol_bits;

    let mut reader = BitReader::new(&packed.bits);
    let mut pairs = Vec::new();

    while !reader.is_empty() {
        let remaining = reader.bits_remaining();
        if remaining == code_bits {
            let code = reader.read_bits(code_bits)? as usize;
            pairs.push(Lz78Pair { code, symbol: None });
            break;
        }
        if remaining < pair_bits {
            return Err(Error::InvalidLength {
                length: packed.bits.len(),
                block: pair_bits,
            });
        }

        let code = reader.read_bits(code_bits)? as usize;
        let index = reader.read_bits(symbol_bits)? as usize;
        let symbol = alphabet.get(index).cloned().ok_or_else(|| Error::UnknownSymbol {
            symbol: format!("index {index}"),
        })?;
        pairs.push(Lz78Pair {
            code,
            symbol: Some(symbol),
        });
    }

    Ok(pairs)
}

/// Encode and pack in one step, using the sorted distinct symbols as alphabet.
pub fn lz78_encode_packed<S: Symbol>(symbols: &[S]) -> Result<(PackedLz78, Vec<S>)> {
    let mut alphabet = symbols.to_vec();
    alphabet.sort();
    alphabet.dedup();

    let encoding = lz78_encode(symbols);
    let packed = lz78_pack(&encoding, &alphabet)?;
    Ok((packed, alphabet))
}

/// Unpack and decode in one step.
pub fn lz78_decode_packed<S: Symbol>(packed: &PackedLz78, alphabet: &[S]) -> Result<Vec<S>> {
    let pairs = lz78_unpack(packed, alphabet)?;
    lz78_decode(&pairs)
}
