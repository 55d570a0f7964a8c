//! Shannon-Fano code construction.
//!
//! Symbols sorted by descending probability are split recursively: the left
//! part ends at the first index where the running probability reaches half of
//! the partition's mass, and gets `0`; the rest gets `1`. The result is always
//! prefix-free but not necessarily optimal.

use super::CodeTable;
use crate::bitio::BitString;
use crate::error::{Error, Result};
use crate::model::Symbol;

/// Build a Shannon-Fano code from `(symbol, probability)` pairs.
///
/// The pairs are sorted by descending probability first (stable, so ties keep
/// the given order); passing `Pmf::sorted_by_probability()` is the usual call.
/// The returned table lists symbols in that sorted order.
///
/// # Errors
/// - `Error::EmptyInput` for no pairs
/// - `Error::InvalidParameter` for a negative or non-finite probability, or a
///   repeated symbol
pub fn build_fano_code<S: Symbol>(probabilities: &[(S, f64)]) -> Result<CodeTable<S>> {
    if probabilities.is_empty() {
        return Err(Error::EmptyInput);
    }
    if let Some((symbol, p)) = probabilities
        .iter()
        .find(|(_, p)| !p.is_finite() || *p < 0.0)
    {
        return Err(Error::InvalidParameter(format!(
            "probability {p} for {symbol:?} is not a valid weight"
        )));
    }
    for (index, (symbol, _)) in probabilities.iter().enumerate() {
        if probabilities[..index].iter().any(|(earlier, _)| earlier == symbol) {
            return Err(Error::InvalidParameter(format!(
                "symbol {symbol:?} listed twice"
            )));
        }
    }

    let mut sorted = probabilities.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut codes = vec![BitString::new(); sorted.len()];
    split(&sorted, 0, BitString::new(), &mut codes);

    let table: Vec<(S, BitString)> = sorted
        .into_iter()
        .zip(codes)
        .map(|((symbol, _), code)| (symbol, code))
        .collect();

    tracing::debug!(symbols = table.len(), "built shannon-fano code");
    Ok(CodeTable::from_trusted(table))
}

/// Assign codes for `part`, whose first element sits at `offset` in `codes`.
fn split<S>(part: &[(S, f64)], offset: usize, prefix: BitString, codes: &mut [BitString]) {
    if part.len() == 1 {
        codes[offset] = if prefix.is_empty() {
            BitString::from(vec![false])
        } else {
            prefix
        };
        return;
    }

    let total: f64 = part.iter().map(|(_, p)| p).sum();
    let half = total / 2.0;
    let mut running = 0.0;
    let mut cut = part.len() - 1;
    for (i, (_, p)) in part.iter().enumerate() {
        running += p;
        if running >= half {
            cut = i + 1;
            break;
        }
    }
    // both halves must be non-empty
    let cut = cut.clamp(1, part.len() - 1);

    let mut left = prefix.clone();
    left.push(false);
    split(&part[..cut], offset, left, codes);

    let mut right = prefix;
    right.push(true);
    split(&part[cut..], offset + cut, right, codes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pmf;

    fn code_of(table: &CodeTable<char>, symbol: char) -> String {
        table.code(&symbol).unwrap().to_string()
    }

    #[test]
    fn test_textbook_example() {
        let table = build_fano_code(&[
            ('a', 0.35),
            ('b', 0.17),
            ('c', 0.17),
            ('d', 0.16),
            ('e', 0.15),
        ])
        .unwrap();

        // 0.35 + 0.17 = 0.52 >= 0.5 closes the left half; on the right,
        // 0.17 + 0.16 = 0.33 >= 0.24 closes {c, d}
        assert_eq!(code_of(&table, 'a'), "00");
        assert_eq!(code_of(&table, 'b'), "01");
        assert_eq!(code_of(&table, 'c'), "100");
        assert_eq!(code_of(&table, 'd'), "101");
        assert_eq!(code_of(&table, 'e'), "11");
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_sorts_input() {
        let table = build_fano_code(&[('x', 0.1), ('y', 0.9)]).unwrap();
        let order: Vec<char> = table.entries().iter().map(|(s, _)| *s).collect();
        assert_eq!(order, vec!['y', 'x']);
        assert_eq!(code_of(&table, 'y'), "0");
        assert_eq!(code_of(&table, 'x'), "1");
    }

    #[test]
    fn test_single_symbol() {
        let table = build_fano_code(&[('q', 1.0)]).unwrap();
        assert_eq!(code_of(&table, 'q'), "0");
    }

    #[test]
    fn test_not_worse_than_entropy_plus_one_on_text() {
        let text: Vec<char> = "shannon fano coding splits by cumulative mass".chars().collect();
        let pmf = Pmf::from_symbols(&text).unwrap();
        let table = build_fano_code(&pmf.sorted_by_probability()).unwrap();
        let avg = table.average_length(&pmf).unwrap();

        assert!(table.is_prefix_free());
        assert!(table.kraft_sum() <= 1.0 + 1e-12);
        assert!(avg >= pmf.entropy() - 1e-12);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            build_fano_code::<char>(&[]),
            Err(Error::EmptyInput)
        ));
        assert!(build_fano_code(&[('a', f64::NAN)]).is_err());
        assert!(build_fano_code(&[('a', -0.5), ('b', 1.5)]).is_err());
    }

    #[test]
    fn test_rejects_repeated_symbol() {
        let result = build_fano_code(&[('a', 0.5), ('b', 0.25), ('a', 0.25)]);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }
}
