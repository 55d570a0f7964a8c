//! Fixed-length codes.

use super::CodeTable;
use crate::bitio::{ceil_log2, BitWriter};
use crate::error::{Error, Result};
use crate::model::Symbol;

/// Bit width of a fixed-length code for `m` symbols: `ceil(log2 m)`, minimum 1.
pub fn fixed_code_width(m: usize) -> usize {
    ceil_log2(m).max(1)
}

/// Assign sequential `fixed_code_width(M)`-bit codes in the given alphabet order.
///
/// # Errors
/// - `Error::EmptyInput` for an empty alphabet
/// - `Error::InvalidParameter` for a repeated symbol
pub fn build_fixed_code<S: Symbol>(alphabet: &[S]) -> Result<CodeTable<S>> {
    if alphabet.is_empty() {
        return Err(Error::EmptyInput);
    }

    let width = fixed_code_width(alphabet.len());
    let mut entries = Vec::with_capacity(alphabet.len());
    for (index, symbol) in alphabet.iter().enumerate() {
        if alphabet[..index].contains(symbol) {
            return Err(Error::InvalidParameter(format!(
                "symbol {symbol:?} listed twice"
            )));
        }
        let mut writer = BitWriter::new();
        writer.write_bits(index as u64, width)?;
        entries.push((symbol.clone(), writer.finish()));
    }

    tracing::debug!(symbols = alphabet.len(), width, "built fixed-length code");
    Ok(CodeTable::from_trusted(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(fixed_code_width(1), 1);
        assert_eq!(fixed_code_width(2), 1);
        assert_eq!(fixed_code_width(4), 2);
        assert_eq!(fixed_code_width(5), 3);
        assert_eq!(fixed_code_width(64), 6);
    }

    #[test]
    fn test_sequential_codes() {
        let table = build_fixed_code(&['a', 'b', 'c', 'd']).unwrap();
        let codes: Vec<String> = table
            .entries()
            .iter()
            .map(|(_, c)| c.to_string())
            .collect();
        assert_eq!(codes, vec!["00", "01", "10", "11"]);
        assert!(table.is_prefix_free());
        assert_eq!(table.kraft_sum(), 1.0);
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = build_fixed_code(&["only"]).unwrap();
        assert_eq!(table.code(&"only").unwrap().to_string(), "0");
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            build_fixed_code::<char>(&[]),
            Err(Error::EmptyInput)
        ));
        assert!(build_fixed_code(&['a', 'a']).is_err());
    }
}
