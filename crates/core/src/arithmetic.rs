//! Adaptive arithmetic coding with exact integer intervals.
//!
//! The coder keeps the current interval `[low, low + width)` inside `[0, 1)`
//! as two arbitrary-precision numerators over one shared denominator, the
//! product of the model totals seen so far. Narrowing by a symbol multiplies
//! each of them by a small integer, so no precision is lost and no fraction
//! is ever reduced. The probability model starts with a count of 1 for every
//! symbol of the (sorted) alphabet and increments the count of each coded
//! symbol; the encoder and decoder perform the same updates in the same
//! order, which keeps their partitions of `[0, 1)` identical.
//!
//! # Termination
//!
//! The encoder emits the shortest binary fraction `m / 2^k` that lies inside
//! the final interval, as `k` bits. If a `k`-bit fraction fits, so does a
//! `(k + 1)`-bit one, so `k` is found by binary search below the bound given
//! by the interval width. A one-symbol alphabet never narrows the interval,
//! so it encodes to zero bits.
//!
//! # State
//!
//! An [`AdaptiveModel`] belongs to exactly one encode or decode session. Each
//! call constructs its own; nothing is shared between calls.

use crate::bitio::BitString;
use crate::error::{Error, Result};
use crate::model::Symbol;
use num::{BigInt, One, ToPrimitive, Zero};

/// Longest sequence one encode or decode session handles.
pub const MAX_SYMBOL_COUNT: usize = u32::MAX as usize;

/// Per-session adaptive frequency model.
///
/// # Invariants
/// - `symbols` is sorted and free of duplicates
/// - every count is at least 1
/// - `cumulative[i]` is the sum of `counts[..i]`; `cumulative[len] == total`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveModel<S> {
    symbols: Vec<S>,
    counts: Vec<u64>,
    cumulative: Vec<u64>,
}

impl<S: Symbol> AdaptiveModel<S> {
    /// Uniform model over `alphabet` (sorted and deduplicated).
    pub fn new(mut alphabet: Vec<S>) -> Self {
        alphabet.sort();
        alphabet.dedup();
        let counts = vec![1; alphabet.len()];
        let cumulative = (0..=alphabet.len() as u64).collect();
        Self {
            symbols: alphabet,
            counts,
            cumulative,
        }
    }

    /// Uniform model over the distinct symbols of `sequence`.
    pub fn from_sequence(sequence: &[S]) -> Self {
        Self::new(sequence.to_vec())
    }

    /// Alphabet in model order.
    pub fn symbols(&self) -> &[S] {
        &self.symbols
    }

    /// Current count of every symbol, in model order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Current `(symbol, probability)` pairs.
    pub fn probabilities(&self) -> Vec<(S, f64)> {
        let total = self.total() as f64;
        self.symbols
            .iter()
            .zip(&self.counts)
            .map(|(s, &c)| (s.clone(), c as f64 / total))
            .collect()
    }

    fn index_of(&self, symbol: &S) -> Option<usize> {
        self.symbols.binary_search(symbol).ok()
    }

    /// Cumulative counts `[cLow, cHigh)` of symbol `index`.
    fn bounds(&self, index: usize) -> (u64, u64) {
        (self.cumulative[index], self.cumulative[index + 1])
    }

    /// Index of the symbol with `cLow <= target < cHigh`, for a target
    /// below the total.
    fn find(&self, target: u64) -> Option<usize> {
        if target >= self.total() {
            return None;
        }
        match self.cumulative.binary_search(&target) {
            Ok(i) => Some(i),
            Err(i) => Some(i - 1),
        }
    }

    /// Record one more occurrence of symbol `index`.
    fn update(&mut self, index: usize) {
        self.counts[index] += 1;
        for c in &mut self.cumulative[index + 1..] {
            *c += 1;
        }
    }
}

/// `[low, low + width)` as numerators over `denominator`.
#[derive(Debug)]
struct Interval {
    low: BigInt,
    width: BigInt,
    denominator: BigInt,
}

impl Interval {
    fn unit() -> Self {
        Self {
            low: BigInt::zero(),
            width: BigInt::one(),
            denominator: BigInt::one(),
        }
    }

    /// Keep the part `[c_low, c_high) / total` of the current interval.
    fn narrow(&mut self, c_low: u64, c_high: u64, total: u64) {
        self.low = &self.low * total + &self.width * c_low;
        self.width *= c_high - c_low;
        self.denominator *= total;
    }

    /// Smallest `m` with `low <= m / 2^k < low + width`, if one exists.
    fn dyadic_point(&self, k: usize) -> Option<BigInt> {
        let m = ((&self.low << k) + &self.denominator - 1u32) / &self.denominator;
        let high = (&self.low + &self.width) << k;
        (&m * &self.denominator < high).then_some(m)
    }

    /// Shortest `k`-bit fraction inside the interval.
    fn shortest_fraction(&self) -> Result<BitString> {
        // width > 2^-(bits(den) - bits(width) + 1), so that many bits always fit
        let bound = (self.denominator.bits() + 1).saturating_sub(self.width.bits());
        let mut lo = 0usize;
        let mut hi = usize::try_from(bound)
            .map_err(|_| Error::InvalidParameter("arithmetic interval too narrow".into()))?;

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.dyadic_point(mid).is_some() {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        let m = self
            .dyadic_point(lo)
            .ok_or_else(|| Error::InvalidParameter("empty arithmetic interval".into()))?;
        fixed_width_binary(&m, lo)
    }
}

/// Output of one encode session.
#[derive(Debug, Clone)]
pub struct ArithmeticEncoding<S> {
    /// Binary fraction identifying a point inside the final interval
    pub bits: BitString,
    /// Number of symbols encoded (the decoder needs it to stop)
    pub symbol_count: usize,
    /// Sorted starting alphabet (the decoder needs it to initialise its model)
    pub alphabet: Vec<S>,
    /// Model state after the last update
    pub model: AdaptiveModel<S>,
}

fn check_symbol_count(count: usize) -> Result<()> {
    if count > MAX_SYMBOL_COUNT {
        return Err(Error::InvalidParameter(format!(
            "{count} symbols exceed the limit of {MAX_SYMBOL_COUNT}"
        )));
    }
    Ok(())
}

/// Encode `symbols` with a fresh adaptive model over their distinct symbols.
///
/// An empty sequence encodes to an empty bit string.
///
/// # Errors
/// Returns `Error::InvalidParameter` for more than [`MAX_SYMBOL_COUNT`] symbols.
pub fn arithmetic_encode<S: Symbol>(symbols: &[S]) -> Result<ArithmeticEncoding<S>> {
    check_symbol_count(symbols.len())?;

    let mut model = AdaptiveModel::from_sequence(symbols);
    let alphabet = model.symbols().to_vec();
    let mut interval = Interval::unit();

    for symbol in symbols {
        let index = model
            .index_of(symbol)
            .ok_or_else(|| Error::unknown_symbol(symbol))?;
        let (c_low, c_high) = model.bounds(index);
        interval.narrow(c_low, c_high, model.total());
        model.update(index);
    }

    let bits = interval.shortest_fraction()?;

    tracing::debug!(
        symbols = symbols.len(),
        alphabet = alphabet.len(),
        bits = bits.len(),
        "arithmetic encode finished"
    );

    Ok(ArithmeticEncoding {
        bits,
        symbol_count: symbols.len(),
        alphabet,
        model,
    })
}

/// Decode `symbol_count` symbols from `bits`, starting from a uniform model
/// over `alphabet`.
///
/// The stream carries no end marker: a count larger than the one encoded
/// keeps decoding past the original symbols.
///
/// # Errors
/// - `Error::EmptyInput` if `symbol_count > 0` and `alphabet` is empty
/// - `Error::InvalidParameter` for more than [`MAX_SYMBOL_COUNT`] symbols, or
///   if the value leaves `[0, 1)` (not reachable for bits produced by
///   [`arithmetic_encode`])
pub fn arithmetic_decode<S: Symbol>(
    bits: &[bool],
    symbol_count: usize,
    alphabet: &[S],
) -> Result<Vec<S>> {
    check_symbol_count(symbol_count)?;
    if symbol_count == 0 {
        return Ok(Vec::new());
    }
    if alphabet.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut model = AdaptiveModel::new(alphabet.to_vec());
    // value = numerator / denominator, rescaled to [0, 1) after every symbol
    let mut numerator = bits.iter().fold(BigInt::zero(), |acc, &bit| {
        (acc << 1usize) + BigInt::from(u8::from(bit))
    });
    let mut denominator = BigInt::one() << bits.len();
    let mut out = Vec::with_capacity(symbol_count.min(bits.len() + 1));

    for step in 0..symbol_count {
        let total = model.total();
        let index = (&numerator * total / &denominator)
            .to_u64()
            .and_then(|target| model.find(target))
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "arithmetic code value left [0, 1) at symbol {step}"
                ))
            })?;
        let (c_low, c_high) = model.bounds(index);

        numerator = numerator * total - &denominator * c_low;
        denominator *= c_high - c_low;

        out.push(model.symbols()[index].clone());
        model.update(index);
    }

    Ok(out)
}

fn fixed_width_binary(m: &BigInt, k: usize) -> Result<BitString> {
    if k == 0 {
        return Ok(BitString::new());
    }
    let digits = m.to_str_radix(2);
    format!("{digits:0>k$}").parse()
}
