//! Generic encode/decode with any prefix code table.
//!
//! Decoding walks a binary trie rebuilt from the table on every call. The trie
//! is an arena of nodes indexed by `usize`; a node with a symbol is terminal.

use super::CodeTable;
use crate::bitio::BitString;
use crate::error::{Error, Result};
use crate::model::Symbol;

/// Concatenate the codeword of each symbol in input order.
///
/// # Errors
/// Returns `Error::UnknownSymbol` for a symbol without a codeword.
pub fn encode_with_table<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> Result<BitString> {
    let mut bits = BitString::with_capacity(symbols.len() * table.max_length());
    for symbol in symbols {
        let code = table
            .code(symbol)
            .ok_or_else(|| Error::unknown_symbol(symbol))?;
        bits.extend_from_bits(code);
    }
    Ok(bits)
}

/// Result of decoding a bit stream.
///
/// A malformed or truncated stream is not fatal: decoding stops and the
/// symbols decoded so far are kept, with `truncated_at` set to the bit
/// position where the stream stopped matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<S> {
    pub symbols: Vec<S>,
    pub truncated_at: Option<usize>,
}

impl<S> Decoded<S> {
    /// True if the whole stream decoded into complete codewords.
    pub fn is_complete(&self) -> bool {
        self.truncated_at.is_none()
    }

    /// Convert a truncation flag into `Error::DecodeTruncated`.
    pub fn into_result(self) -> Result<Vec<S>> {
        match self.truncated_at {
            None => Ok(self.symbols),
            Some(position) => Err(Error::DecodeTruncated {
                position,
                decoded: self.symbols.len(),
            }),
        }
    }
}

#[derive(Debug)]
struct TrieNode<S> {
    children: [Option<usize>; 2],
    symbol: Option<S>,
}

impl<S> TrieNode<S> {
    fn empty() -> Self {
        Self {
            children: [None, None],
            symbol: None,
        }
    }
}

/// Decode trie built from a code table.
#[derive(Debug)]
struct DecodeTrie<S> {
    nodes: Vec<TrieNode<S>>,
}

impl<S: Symbol> DecodeTrie<S> {
    const ROOT: usize = 0;

    fn build(table: &CodeTable<S>) -> Result<Self> {
        let mut nodes = vec![TrieNode::empty()];

        for (symbol, code) in table.entries() {
            let mut current = Self::ROOT;
            for &bit in code.iter() {
                if nodes[current].symbol.is_some() {
                    return Err(prefix_conflict(symbol));
                }
                let child = nodes[current].children[usize::from(bit)];
                current = match child {
                    Some(next) => next,
                    None => {
                        nodes.push(TrieNode::empty());
                        let next = nodes.len() - 1;
                        nodes[current].children[usize::from(bit)] = Some(next);
                        next
                    }
                };
            }
            let node = &mut nodes[current];
            if node.symbol.is_some() || node.children.iter().any(Option::is_some) {
                return Err(prefix_conflict(symbol));
            }
            node.symbol = Some(symbol.clone());
        }

        Ok(Self { nodes })
    }

    fn decode(&self, bits: &[bool]) -> Decoded<S> {
        let mut symbols = Vec::new();
        let mut current = Self::ROOT;
        // bit index where the codeword being read started
        let mut code_start = 0;

        for (position, &bit) in bits.iter().enumerate() {
            match self.nodes[current].children[usize::from(bit)] {
                Some(next) => current = next,
                None => {
                    return Decoded {
                        symbols,
                        truncated_at: Some(code_start),
                    }
                }
            }

            if let Some(symbol) = &self.nodes[current].symbol {
                symbols.push(symbol.clone());
                current = Self::ROOT;
                code_start = position + 1;
            }
        }

        let truncated_at = (current != Self::ROOT).then_some(code_start);
        Decoded {
            symbols,
            truncated_at,
        }
    }
}

fn prefix_conflict<S: Symbol>(symbol: &S) -> Error {
    Error::InvalidParameter(format!(
        "code table is not prefix-free at symbol {symbol:?}"
    ))
}

/// Decode `bits` with a trie built from `table`.
///
/// # Errors
/// Returns `Error::InvalidParameter` only if `table` is not prefix-free.
/// Truncation is reported through [`Decoded::truncated_at`].
pub fn decode_with_table<S: Symbol>(bits: &[bool], table: &CodeTable<S>) -> Result<Decoded<S>> {
    let trie = DecodeTrie::build(table)?;
    let decoded = trie.decode(bits);

    if let Some(position) = decoded.truncated_at {
        tracing::debug!(
            position,
            decoded = decoded.symbols.len(),
            "prefix decode stopped early"
        );
    }
    Ok(decoded)
}
