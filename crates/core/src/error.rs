//! Error types for the infocode engine.
//!
//! Every failure is a local, recoverable condition reported as a structured
//! value. Batch analyses rely on this: one bad sequence produces an `Err` for
//! that case and the remaining cases still run.

use thiserror::Error;

/// Top-level error type for all codec and channel operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Input: nothing left to process after filtering
/// - Code tables: a symbol without a codeword, or a stream that stops mid-code
/// - Block codes: a bit sequence that does not split into whole blocks
/// - LZ78: a pair that references a phrase the decoder never built
/// - Bit I/O: reading or parsing bit strings
#[derive(Debug, Error)]
pub enum Error {
    /// No symbols or bits to process
    #[error("empty input: no symbols to process")]
    EmptyInput,

    /// Symbol has no entry in the code table or alphabet
    #[error("unknown symbol {symbol}: not present in the code table")]
    UnknownSymbol { symbol: String },

    /// Bit stream ended (or diverged from every codeword) before a full code was read
    #[error("bit stream truncated at bit {position} after {decoded} symbols")]
    DecodeTruncated { position: usize, decoded: usize },

    /// Bit sequence length is not a multiple of the block size
    #[error("invalid length {length}: must be a multiple of {block}")]
    InvalidLength { length: usize, block: usize },

    /// LZ78 pair references a code beyond the current dictionary
    #[error("corrupt dictionary: code {code} referenced with only {dictionary_size} entries")]
    CorruptDictionary { code: usize, dictionary_size: usize },

    /// A caller-supplied parameter is outside its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Bit I/O operation failed
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),
}

impl Error {
    /// Build an `UnknownSymbol` error from any debuggable symbol.
    pub fn unknown_symbol<S: std::fmt::Debug>(symbol: &S) -> Self {
        Error::UnknownSymbol {
            symbol: format!("{symbol:?}"),
        }
    }
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the bit string
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one field)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Character other than '0' or '1' in a textual bit string
    #[error("invalid bit character {character:?} at index {index}")]
    InvalidDigit { character: char, index: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
