//! Probability model: symbol counts, PMF, entropy and relative entropy.
//!
//! A [`Pmf`] is built once per input sequence and is immutable afterwards.
//! Entries keep the order in which symbols first appear in the sequence; that
//! order is the leaf insertion order for Huffman construction, which makes tie
//! breaking reproducible for a given input.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// A unit from a finite alphabet.
///
/// Blanket-implemented for every type that can be hashed, ordered, cloned and
/// printed: `char`, `u8`, `String`, nibble newtypes, and so on.
pub trait Symbol: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Symbol for T {}

/// One alphabet entry of a [`Pmf`].
#[derive(Debug, Clone, PartialEq)]
pub struct PmfEntry<S> {
    pub symbol: S,
    pub count: u64,
    pub probability: f64,
}

/// Probability mass function over the alphabet observed in one sequence.
///
/// # Invariants
/// - at least one entry
/// - every `count >= 1`
/// - probabilities sum to 1 within floating tolerance
#[derive(Debug, Clone)]
pub struct Pmf<S> {
    entries: Vec<PmfEntry<S>>,
    index: HashMap<S, usize>,
    total: u64,
}

impl<S: Symbol> Pmf<S> {
    /// Count symbols and normalise.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `symbols` is empty.
    pub fn from_symbols<'a, I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        let mut counts: Vec<(S, u64)> = Vec::new();
        let mut index: HashMap<S, usize> = HashMap::new();

        for symbol in symbols {
            match index.get(symbol) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(symbol.clone(), counts.len());
                    counts.push((symbol.clone(), 1));
                }
            }
        }

        Self::from_counts(counts)
    }

    /// Build a PMF from explicit `(symbol, count)` pairs, keeping their order.
    ///
    /// # Errors
    /// - `Error::EmptyInput` if no pairs are given
    /// - `Error::InvalidParameter` for a zero count or a repeated symbol
    pub fn from_counts(counts: Vec<(S, u64)>) -> Result<Self> {
        if counts.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut index = HashMap::with_capacity(counts.len());
        for (i, (symbol, count)) in counts.iter().enumerate() {
            if *count == 0 {
                return Err(Error::InvalidParameter(format!(
                    "symbol {symbol:?} has zero count"
                )));
            }
            if index.insert(symbol.clone(), i).is_some() {
                return Err(Error::InvalidParameter(format!(
                    "symbol {symbol:?} listed twice"
                )));
            }
        }

        let total: u64 = counts.iter().map(|(_, c)| c).sum();
        let entries = counts
            .into_iter()
            .map(|(symbol, count)| PmfEntry {
                symbol,
                count,
                probability: count as f64 / total as f64,
            })
            .collect();

        Ok(Self {
            entries,
            index,
            total,
        })
    }

    /// Build a PMF from explicit probabilities (e.g. a designed distribution).
    ///
    /// Counts are not meaningful for such a PMF and are all reported as 1.
    ///
    /// # Errors
    /// - `Error::EmptyInput` if no pairs are given
    /// - `Error::InvalidParameter` if a probability is not in (0, 1], a symbol
    ///   repeats, or the probabilities do not sum to 1
    pub fn from_probabilities(probabilities: Vec<(S, f64)>) -> Result<Self> {
        if probabilities.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut index = HashMap::with_capacity(probabilities.len());
        let mut sum = 0.0;
        for (i, (symbol, p)) in probabilities.iter().enumerate() {
            if !(*p > 0.0 && *p <= 1.0) {
                return Err(Error::InvalidParameter(format!(
                    "probability {p} for {symbol:?} is outside (0, 1]"
                )));
            }
            if index.insert(symbol.clone(), i).is_some() {
                return Err(Error::InvalidParameter(format!(
                    "symbol {symbol:?} listed twice"
                )));
            }
            sum += p;
        }
        if (sum - 1.0).abs() > 1e-9 {
            return Err(Error::InvalidParameter(format!(
                "probabilities sum to {sum}, expected 1"
            )));
        }

        let total = probabilities.len() as u64;
        let entries = probabilities
            .into_iter()
            .map(|(symbol, probability)| PmfEntry {
                symbol,
                count: 1,
                probability,
            })
            .collect();

        Ok(Self {
            entries,
            index,
            total,
        })
    }

    /// Uniform PMF over the given alphabet.
    pub fn uniform(alphabet: &[S]) -> Result<Self> {
        Self::from_counts(alphabet.iter().map(|s| (s.clone(), 1)).collect())
    }

    /// Entries in first-appearance order.
    pub fn entries(&self) -> &[PmfEntry<S>] {
        &self.entries
    }

    /// Probability of `symbol`, or `None` if it is outside the alphabet.
    pub fn probability(&self, symbol: &S) -> Option<f64> {
        self.index.get(symbol).map(|&i| self.entries[i].probability)
    }

    /// Observed count of `symbol`, or `None` if it is outside the alphabet.
    pub fn count(&self, symbol: &S) -> Option<u64> {
        self.index.get(symbol).map(|&i| self.entries[i].count)
    }

    /// Number of distinct symbols (M).
    pub fn alphabet_size(&self) -> usize {
        self.entries.len()
    }

    /// Total number of counted symbols.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Alphabet in first-appearance order.
    pub fn alphabet(&self) -> Vec<S> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    /// Alphabet in sorted order.
    pub fn sorted_alphabet(&self) -> Vec<S> {
        let mut alphabet = self.alphabet();
        alphabet.sort();
        alphabet
    }

    /// `(symbol, probability)` pairs by descending probability.
    ///
    /// The sort is stable, so equal probabilities keep first-appearance order.
    pub fn sorted_by_probability(&self) -> Vec<(S, f64)> {
        let mut sorted: Vec<(S, f64)> = self
            .entries
            .iter()
            .map(|e| (e.symbol.clone(), e.probability))
            .collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
        sorted
    }

    /// Shannon entropy `H = -sum p log2 p` in bits/symbol.
    pub fn entropy(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.probability)
            .filter(|&p| p > 0.0)
            .map(|p| -p * p.log2())
            .sum()
    }

    /// KL divergence from the uniform distribution over this alphabet, in bits.
    ///
    /// Equals `log2(M) - H`.
    pub fn relative_entropy(&self) -> f64 {
        let uniform = 1.0 / self.alphabet_size() as f64;
        self.entries
            .iter()
            .map(|e| e.probability)
            .filter(|&p| p > 0.0)
            .map(|p| p * (p / uniform).log2())
            .sum()
    }
}

/// PMF plus the derived information measures for one sequence.
#[derive(Debug, Clone)]
pub struct EntropyModel<S> {
    pub pmf: Pmf<S>,
    pub entropy: f64,
    pub relative_entropy: f64,
}

impl<S: Symbol> EntropyModel<S> {
    /// Compute the PMF, entropy and relative entropy of `symbols`.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `symbols` is empty.
    pub fn compute(symbols: &[S]) -> Result<Self> {
        let pmf = Pmf::from_symbols(symbols)?;
        let entropy = pmf.entropy();
        let relative_entropy = pmf.relative_entropy();

        tracing::debug!(
            symbols = symbols.len(),
            alphabet = pmf.alphabet_size(),
            entropy,
            relative_entropy,
            "computed entropy model"
        );

        Ok(Self {
            pmf,
            entropy,
            relative_entropy,
        })
    }

    /// Keep only symbols in `allowed`, then compute the model.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if no symbol survives the filter.
    pub fn from_filtered<I>(symbols: I, allowed: &HashSet<S>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        let kept: Vec<S> = symbols
            .into_iter()
            .filter(|s| allowed.contains(s))
            .collect();
        Self::compute(&kept)
    }
}

/// Binary entropy function `Hb(p)` in bits; 0 at p = 0 and p = 1.
pub fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
}

/// Information measures of a source sent over a binary symmetric channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelEntropy {
    /// Source entropy H(X)
    pub source: f64,
    /// H(Y|X) = Hb(p)
    pub conditional: f64,
    /// H(X,Y) = H(X) + H(Y|X)
    pub joint: f64,
}

impl ChannelEntropy {
    /// Combine a source entropy with a BSC crossover probability.
    pub fn for_bsc(source_entropy: f64, crossover: f64) -> Self {
        let conditional = binary_entropy(crossover);
        Self {
            source: source_entropy,
            conditional,
            joint: source_entropy + conditional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_counts_keep_first_appearance_order() {
        let pmf = Pmf::from_symbols(&chars("BABCA")).unwrap();
        assert_eq!(pmf.alphabet(), vec!['B', 'A', 'C']);
        assert_eq!(pmf.count(&'A'), Some(2));
        assert_eq!(pmf.count(&'C'), Some(1));
        assert_eq!(pmf.count(&'Z'), None);
        assert_eq!(pmf.total(), 5);
        assert_eq!(pmf.sorted_alphabet(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let pmf = Pmf::from_symbols(&chars("the quick brown fox")).unwrap();
        let sum: f64 = pmf.entries().iter().map(|e| e.probability).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_entropy() {
        let pmf = Pmf::uniform(&['a', 'b', 'c', 'd']).unwrap();
        assert!((pmf.entropy() - 2.0).abs() < 1e-12);
        assert!(pmf.relative_entropy().abs() < 1e-12);
    }

    #[test]
    fn test_relative_entropy_is_log_m_minus_h() {
        let model = EntropyModel::compute(&chars("AAAAABBBC")).unwrap();
        let m = model.pmf.alphabet_size() as f64;
        assert!((model.relative_entropy - (m.log2() - model.entropy)).abs() < 1e-12);
        assert!(model.relative_entropy > 0.0);
    }

    #[test]
    fn test_single_symbol_has_zero_entropy() {
        let model = EntropyModel::compute(&chars("zzzz")).unwrap();
        assert_eq!(model.entropy, 0.0);
        assert_eq!(model.relative_entropy, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<char> = Vec::new();
        assert!(matches!(
            EntropyModel::compute(&empty),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_filtered_to_empty() {
        let allowed: HashSet<char> = "abc".chars().collect();
        let result = EntropyModel::from_filtered("xyz!".chars(), &allowed);
        assert!(matches!(result, Err(Error::EmptyInput)));

        let model = EntropyModel::from_filtered("a?b?".chars(), &allowed).unwrap();
        assert_eq!(model.pmf.alphabet_size(), 2);
        assert!((model.entropy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_probabilities_validation() {
        assert!(Pmf::from_probabilities(vec![('a', 0.5), ('b', 0.5)]).is_ok());
        assert!(Pmf::from_probabilities(vec![('a', 0.5), ('b', 0.4)]).is_err());
        assert!(Pmf::from_probabilities(vec![('a', 1.0), ('b', 0.0)]).is_err());
        assert!(Pmf::from_probabilities(vec![('a', 0.5), ('a', 0.5)]).is_err());
        assert!(Pmf::<char>::from_probabilities(vec![]).is_err());
    }

    #[test]
    fn test_sorted_by_probability_is_stable() {
        let pmf = Pmf::from_symbols(&chars("CBAAB")).unwrap();
        let sorted: Vec<char> = pmf
            .sorted_by_probability()
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        // B and A tie at 2/5; B appeared first
        assert_eq!(sorted, vec!['B', 'A', 'C']);
    }

    #[test]
    fn test_binary_entropy() {
        assert_eq!(binary_entropy(0.0), 0.0);
        assert_eq!(binary_entropy(1.0), 0.0);
        assert!((binary_entropy(0.5) - 1.0).abs() < 1e-12);
        assert!((binary_entropy(0.05) - 0.286_396_957).abs() < 1e-6);
    }

    #[test]
    fn test_channel_entropy() {
        let ce = ChannelEntropy::for_bsc(3.0, 0.05);
        assert!((ce.joint - (ce.source + ce.conditional)).abs() < 1e-12);
        assert!((ce.conditional - binary_entropy(0.05)).abs() < 1e-12);
    }
}
