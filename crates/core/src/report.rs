//! Coding reports for single sequences and named batches.
//!
//! Reports are plain records built by running the codecs end to end. Derived
//! figures (ratios, percentages) are computed on demand from the stored
//! counts. Every report prints a human-readable summary and exports a
//! `key=value` text form for parsing in tests and scripts.
//!
//! # Batches
//!
//! [`analyze_batch`] runs one method over several named sequences. A case
//! that fails keeps its error and the batch moves on; the summary only
//! averages successful cases.

use crate::arithmetic::{arithmetic_decode, arithmetic_encode};
use crate::bitio::BitString;
use crate::channel::{count_bit_errors, BinarySymmetricChannel};
use crate::error::{Error, Result};
use crate::lz78::{lz78_decode_packed, lz78_encode, lz78_pack};
use crate::model::{ChannelEntropy, EntropyModel, Symbol};
use crate::prefix::{
    build_fano_code, build_fixed_code, build_huffman_code, decode_with_table, efficiency,
    encode_with_table, fixed_code_width, CodeTable,
};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Bits per character of the 8-bit ASCII baseline.
pub const ASCII_BITS: usize = 8;

/// One prefix code applied to a sequence.
#[derive(Debug, Clone)]
pub struct CodeReport<S> {
    pub table: CodeTable<S>,

    /// Expected codeword length under the sequence PMF
    pub average_length: f64,

    /// `H / L` as a fraction
    pub efficiency: f64,

    /// Length of the encoded sequence in bits
    pub encoded_length: usize,

    pub kraft_sum: f64,

    /// Decoding the encoded bits gave back the input exactly
    pub lossless: bool,
}

impl<S: Symbol> CodeReport<S> {
    fn measure(table: CodeTable<S>, symbols: &[S], model: &EntropyModel<S>) -> Result<Self> {
        let average_length = table.average_length(&model.pmf)?;
        let encoded = encode_with_table(symbols, &table)?;
        let decoded = decode_with_table(&encoded, &table)?;
        let lossless = decoded.is_complete() && decoded.symbols == symbols;

        Ok(Self {
            average_length,
            efficiency: efficiency(model.entropy, average_length),
            encoded_length: encoded.len(),
            kraft_sum: table.kraft_sum(),
            lossless,
            table,
        })
    }
}

/// Fixed-length, Huffman and Shannon-Fano coding of one sequence.
#[derive(Debug, Clone)]
pub struct SourceCodingReport<S> {
    pub sequence_length: usize,
    pub alphabet_size: usize,
    pub entropy: f64,
    pub relative_entropy: f64,
    pub fixed: CodeReport<S>,
    pub huffman: CodeReport<S>,
    pub fano: CodeReport<S>,
}

impl<S: Symbol> SourceCodingReport<S> {
    /// Build all three prefix codes for `symbols` and measure them.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` for an empty sequence.
    pub fn analyze(symbols: &[S]) -> Result<Self> {
        let model = EntropyModel::compute(symbols)?;
        Self::from_model(symbols, &model)
    }

    /// Same as [`analyze`](Self::analyze) with a precomputed model.
    pub fn from_model(symbols: &[S], model: &EntropyModel<S>) -> Result<Self> {
        let fixed = build_fixed_code(&model.pmf.alphabet())?;
        let huffman = build_huffman_code(&model.pmf)?;
        let fano = build_fano_code(&model.pmf.sorted_by_probability())?;

        Ok(Self {
            sequence_length: symbols.len(),
            alphabet_size: model.pmf.alphabet_size(),
            entropy: model.entropy,
            relative_entropy: model.relative_entropy,
            fixed: CodeReport::measure(fixed, symbols, model)?,
            huffman: CodeReport::measure(huffman, symbols, model)?,
            fano: CodeReport::measure(fano, symbols, model)?,
        })
    }

    /// Size of the sequence as 8-bit ASCII.
    pub fn ascii_bits(&self) -> usize {
        self.sequence_length * ASCII_BITS
    }

    /// Huffman saving against ASCII, in percent.
    pub fn compression_vs_ascii(&self) -> f64 {
        saving_percent(self.huffman.encoded_length, self.ascii_bits())
    }

    /// Huffman saving against the fixed-length code, in percent.
    pub fn compression_vs_fixed(&self) -> f64 {
        saving_percent(self.huffman.encoded_length, self.fixed.encoded_length)
    }

    /// True if all three codes decoded back to the input.
    pub fn all_lossless(&self) -> bool {
        self.fixed.lossless && self.huffman.lossless && self.fano.lossless
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Source Coding ===");
        println!("Symbols: {} (alphabet {})", self.sequence_length, self.alphabet_size);
        println!("Entropy: {:.4} bits/symbol", self.entropy);
        println!("Relative entropy: {:.4} bits", self.relative_entropy);
        println!();

        for (name, code) in [
            ("Fixed", &self.fixed),
            ("Huffman", &self.huffman),
            ("Shannon-Fano", &self.fano),
        ] {
            println!(
                "{:<13} L = {:.4}  efficiency {:.2}%  {} bits  {}",
                name,
                code.average_length,
                code.efficiency * 100.0,
                code.encoded_length,
                if code.lossless { "lossless ✓" } else { "MISMATCH ✗" },
            );
        }
        println!();

        println!("=== Code Table (Huffman) ===");
        for (symbol, code) in self.huffman.table.entries() {
            println!("  {symbol:?} -> {code}");
        }
        println!();

        println!("ASCII: {} bits", self.ascii_bits());
        println!("Compression vs ASCII: {:.2}%", self.compression_vs_ascii());
        println!("Compression vs fixed: {:.2}%", self.compression_vs_fixed());
        println!();
    }

    /// Export as `key=value` lines.
    pub fn export_text(&self) -> String {
        format!(
            "sequence_length={}\n\
             alphabet_size={}\n\
             entropy={:.4}\n\
             fixed_average_length={:.4}\n\
             huffman_average_length={:.4}\n\
             fano_average_length={:.4}\n\
             huffman_efficiency={:.2}\n\
             fano_efficiency={:.2}\n\
             ascii_bits={}\n\
             huffman_bits={}\n\
             compression_vs_ascii={:.2}\n\
             lossless={}\n",
            self.sequence_length,
            self.alphabet_size,
            self.entropy,
            self.fixed.average_length,
            self.huffman.average_length,
            self.fano.average_length,
            self.huffman.efficiency * 100.0,
            self.fano.efficiency * 100.0,
            self.ascii_bits(),
            self.huffman.encoded_length,
            self.compression_vs_ascii(),
            self.all_lossless(),
        )
    }
}

/// Universal (model-free) coding methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversalMethod {
    Arithmetic,
    Lz78,
}

impl UniversalMethod {
    pub fn name(self) -> &'static str {
        match self {
            UniversalMethod::Arithmetic => "arithmetic",
            UniversalMethod::Lz78 => "lz78",
        }
    }
}

/// Dictionary statistics of an LZ78 run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryStats<S> {
    /// Entries including the empty phrase
    pub dictionary_size: usize,

    /// Phrases of two or more symbols
    pub patterns_found: usize,

    pub longest_pattern: Vec<S>,
}

/// Arithmetic or LZ78 coding of one sequence against a fixed-length baseline.
#[derive(Debug, Clone)]
pub struct UniversalReport<S> {
    pub method: UniversalMethod,
    pub sequence_length: usize,
    pub alphabet_size: usize,
    pub entropy: f64,
    pub encoded_length: usize,

    /// `sequence_length * ceil(log2 M)`
    pub fixed_length: usize,

    pub lossless: bool,

    /// Present for LZ78 only
    pub dictionary: Option<DictionaryStats<S>>,
}

impl<S: Symbol> UniversalReport<S> {
    /// Run `method` over `symbols`, decode, and compare.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` for an empty sequence, or whatever the
    /// codec reports.
    pub fn analyze(symbols: &[S], method: UniversalMethod) -> Result<Self> {
        let model = EntropyModel::compute(symbols)?;
        let alphabet_size = model.pmf.alphabet_size();

        let (encoded_length, lossless, dictionary) = match method {
            UniversalMethod::Arithmetic => {
                let encoded = arithmetic_encode(symbols)?;
                let decoded =
                    arithmetic_decode(&encoded.bits, encoded.symbol_count, &encoded.alphabet)?;
                (encoded.bits.len(), decoded == symbols, None)
            }
            UniversalMethod::Lz78 => {
                let alphabet = model.pmf.sorted_alphabet();
                let encoding = lz78_encode(symbols);
                let packed = lz78_pack(&encoding, &alphabet)?;
                let decoded = lz78_decode_packed(&packed, &alphabet)?;

                let phrases = encoding.dictionary.phrases();
                let stats = DictionaryStats {
                    dictionary_size: encoding.dictionary.len(),
                    patterns_found: phrases.iter().filter(|p| p.len() >= 2).count(),
                    longest_pattern: encoding.dictionary.longest_phrase().to_vec(),
                };
                (packed.bits.len(), decoded == symbols, Some(stats))
            }
        };

        tracing::debug!(
            method = method.name(),
            symbols = symbols.len(),
            encoded_length,
            lossless,
            "universal coding analysed"
        );

        Ok(Self {
            method,
            sequence_length: symbols.len(),
            alphabet_size,
            entropy: model.entropy,
            encoded_length,
            fixed_length: symbols.len() * fixed_code_width(alphabet_size),
            lossless,
            dictionary,
        })
    }

    pub fn bits_per_symbol(&self) -> f64 {
        if self.sequence_length == 0 {
            0.0
        } else {
            self.encoded_length as f64 / self.sequence_length as f64
        }
    }

    /// Encoded over fixed length; below 1.0 means compression.
    pub fn efficiency(&self) -> f64 {
        if self.fixed_length == 0 {
            0.0
        } else {
            self.encoded_length as f64 / self.fixed_length as f64
        }
    }

    /// Saving against the fixed-length code, in percent (negative on
    /// expansion).
    pub fn compression_ratio(&self) -> f64 {
        saving_percent(self.encoded_length, self.fixed_length)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== {} coding ===", self.method.name());
        println!("Symbols: {} (alphabet {})", self.sequence_length, self.alphabet_size);
        println!("Entropy: {:.4} bits/symbol", self.entropy);
        if let Some(stats) = &self.dictionary {
            println!("Dictionary size: {}", stats.dictionary_size);
            println!("Patterns found: {}", stats.patterns_found);
            println!("Longest pattern: {:?}", stats.longest_pattern);
        }
        println!("Encoded: {} bits", self.encoded_length);
        println!("Fixed-length: {} bits", self.fixed_length);
        println!("Bits per symbol: {:.4}", self.bits_per_symbol());
        println!(
            "Efficiency: {:.4} ({})",
            self.efficiency(),
            if self.efficiency() < 1.0 { "compression" } else { "expansion" }
        );
        println!("Compression ratio: {:.2}%", self.compression_ratio());
        println!("Lossless: {}", if self.lossless { "yes ✓" } else { "no ✗" });
    }

    /// Export as `key=value` lines.
    pub fn export_text(&self) -> String {
        let mut text = format!(
            "method={}\n\
             sequence_length={}\n\
             alphabet_size={}\n\
             entropy={:.4}\n\
             encoded_length={}\n\
             fixed_length={}\n\
             bits_per_symbol={:.4}\n\
             efficiency={:.4}\n\
             compression_ratio={:.2}\n\
             lossless={}\n",
            self.method.name(),
            self.sequence_length,
            self.alphabet_size,
            self.entropy,
            self.encoded_length,
            self.fixed_length,
            self.bits_per_symbol(),
            self.efficiency(),
            self.compression_ratio(),
            self.lossless,
        );
        if let Some(stats) = &self.dictionary {
            text.push_str(&format!(
                "dictionary_size={}\npatterns_found={}\nlongest_pattern_length={}\n",
                stats.dictionary_size,
                stats.patterns_found,
                stats.longest_pattern.len(),
            ));
        }
        text
    }
}

/// One named case of a batch.
#[derive(Debug)]
pub struct BatchCase<S> {
    pub name: String,
    pub outcome: Result<UniversalReport<S>>,
}

/// Aggregate over the successful cases of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub cases: usize,
    pub failed: usize,
    pub average_efficiency: f64,
    pub average_compression: f64,
    /// Every successful case was lossless (false if none succeeded)
    pub all_lossless: bool,
    pub total_patterns_found: usize,
}

/// Reports for every case plus the summary.
#[derive(Debug)]
pub struct BatchReport<S> {
    pub method: UniversalMethod,
    pub cases: Vec<BatchCase<S>>,
    pub summary: BatchSummary,
}

impl<S: Symbol> BatchReport<S> {
    /// Report for the case called `name`, if it succeeded.
    pub fn report(&self, name: &str) -> Option<&UniversalReport<S>> {
        self.cases
            .iter()
            .find(|case| case.name == name)
            .and_then(|case| case.outcome.as_ref().ok())
    }

    /// Print every case and the summary to stdout.
    pub fn print_summary(&self) {
        for case in &self.cases {
            println!("\n--- {} ---", case.name);
            match &case.outcome {
                Ok(report) => report.print_summary(),
                Err(e) => println!("✗ failed: {e}"),
            }
        }

        let s = &self.summary;
        println!("\n=== Batch Summary ({}) ===", self.method.name());
        println!("Cases: {} ({} failed)", s.cases, s.failed);
        println!("Average efficiency: {:.4}", s.average_efficiency);
        println!("Average compression: {:.2}%", s.average_compression);
        println!("All lossless: {}", s.all_lossless);
        if self.method == UniversalMethod::Lz78 {
            println!("Total patterns found: {}", s.total_patterns_found);
        }
    }
}

/// Analyse every `(name, sequence)` case with `method`.
pub fn analyze_batch<S: Symbol>(
    cases: &[(String, Vec<S>)],
    method: UniversalMethod,
) -> BatchReport<S> {
    let cases: Vec<BatchCase<S>> = cases
        .iter()
        .map(|(name, symbols)| {
            let outcome = UniversalReport::analyze(symbols, method);
            if let Err(e) = &outcome {
                tracing::warn!(case = %name, error = %e, "batch case failed");
            }
            BatchCase {
                name: name.clone(),
                outcome,
            }
        })
        .collect();

    let reports: Vec<&UniversalReport<S>> = cases
        .iter()
        .filter_map(|c| c.outcome.as_ref().ok())
        .collect();
    let succeeded = reports.len();
    let mean = |f: &dyn Fn(&UniversalReport<S>) -> f64| {
        if succeeded == 0 {
            0.0
        } else {
            reports.iter().map(|r| f(r)).sum::<f64>() / succeeded as f64
        }
    };

    let summary = BatchSummary {
        cases: cases.len(),
        failed: cases.len() - succeeded,
        average_efficiency: mean(&|r| r.efficiency()),
        average_compression: mean(&|r| r.compression_ratio()),
        all_lossless: succeeded > 0 && reports.iter().all(|r| r.lossless),
        total_patterns_found: reports
            .iter()
            .filter_map(|r| r.dictionary.as_ref())
            .map(|d| d.patterns_found)
            .sum(),
    };

    BatchReport {
        method,
        cases,
        summary,
    }
}

/// Filter `text` to `allowed` characters and analyse it as a source.
///
/// # Errors
/// Returns `Error::EmptyInput` when no allowed character remains.
pub fn analyze_text(text: &str, allowed: &HashSet<char>) -> Result<SourceCodingReport<char>> {
    let symbols: Vec<char> = text.chars().filter(|c| allowed.contains(c)).collect();
    if symbols.is_empty() {
        return Err(Error::EmptyInput);
    }
    SourceCodingReport::analyze(&symbols)
}

/// Text sent over a binary symmetric channel with a fixed-length code.
#[derive(Debug, Clone)]
pub struct BscTextReport {
    pub model: EntropyModel<char>,
    pub entropies: ChannelEntropy,
    pub crossover: f64,

    /// Bits per character of the fixed-length code over the allowed set
    pub code_width: usize,

    pub sent_bits: usize,
    pub bit_errors: usize,
    pub original_length: usize,

    /// Received words that are not codewords are dropped
    pub decoded_text: String,
}

impl BscTextReport {
    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Binary Symmetric Channel ===");
        println!("Crossover probability: {}", self.crossover);
        println!("Code width: {} bits/char", self.code_width);
        println!("Entropy H(X): {:.4}", self.entropies.source);
        println!("Relative entropy: {:.4}", self.model.relative_entropy);
        println!("Conditional entropy H(Y|X): {:.4}", self.entropies.conditional);
        println!("Joint entropy H(X,Y): {:.4}", self.entropies.joint);
        println!("Bits sent: {} ({} flipped)", self.sent_bits, self.bit_errors);
        println!(
            "Characters: {} sent, {} decoded",
            self.original_length,
            self.decoded_text.chars().count()
        );
        let preview: String = self.decoded_text.chars().take(100).collect();
        println!("Decoded: {preview}");
    }
}

/// Filter `text` to `allowed`, map each character to a fixed-length code over
/// the sorted allowed set, send the bits through `channel` and decode them.
///
/// # Errors
/// Returns `Error::EmptyInput` when no allowed character remains.
pub fn bsc_text_experiment<R: Rng + ?Sized>(
    text: &str,
    allowed: &HashSet<char>,
    channel: &BinarySymmetricChannel,
    rng: &mut R,
) -> Result<BscTextReport> {
    let model = EntropyModel::from_filtered(text.chars(), allowed)?;
    let characters: Vec<char> = text.chars().filter(|c| allowed.contains(c)).collect();

    let mut alphabet: Vec<char> = allowed.iter().copied().collect();
    alphabet.sort_unstable();
    let table = build_fixed_code(&alphabet)?;
    let width = fixed_code_width(alphabet.len());
    let lookup: HashMap<&BitString, char> =
        table.entries().iter().map(|(c, code)| (code, *c)).collect();

    let sent = encode_with_table(&characters, &table)?;
    let received = channel.transmit(&sent, rng);
    let decoded_text: String = received
        .chunks_exact(width)
        .filter_map(|word| lookup.get(&BitString::from(word)).copied())
        .collect();

    Ok(BscTextReport {
        entropies: channel.entropies(model.entropy),
        crossover: channel.crossover(),
        code_width: width,
        sent_bits: sent.len(),
        bit_errors: count_bit_errors(&sent, &received),
        original_length: characters.len(),
        decoded_text,
        model,
    })
}

fn saving_percent(encoded: usize, baseline: usize) -> f64 {
    if baseline == 0 {
        0.0
    } else {
        (1.0 - encoded as f64 / baseline as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_source_report_abbca() {
        let report = SourceCodingReport::analyze(&chars("ABBCA")).unwrap();
        assert_eq!(report.sequence_length, 5);
        assert_eq!(report.alphabet_size, 3);
        assert_eq!(report.fixed.average_length, 2.0);
        // A=11, B=0, C=10 -> 2*0.4 + 1*0.4 + 2*0.2
        assert!((report.huffman.average_length - 1.6).abs() < 1e-12);
        assert_eq!(report.huffman.encoded_length, 8);
        assert_eq!(report.ascii_bits(), 40);
        assert!((report.compression_vs_ascii() - 80.0).abs() < 1e-9);
        assert!(report.all_lossless());
    }

    #[test]
    fn test_source_report_uniform_is_optimal() {
        let report = SourceCodingReport::analyze(&chars("ABCDDCBA")).unwrap();
        assert_eq!(report.huffman.average_length, 2.0);
        assert!((report.huffman.efficiency - 1.0).abs() < 1e-12);
        assert!((report.compression_vs_fixed()).abs() < 1e-12);
    }

    #[test]
    fn test_source_report_empty() {
        assert!(matches!(
            SourceCodingReport::<char>::analyze(&[]),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_universal_lz78_aaaa() {
        let report = UniversalReport::analyze(&chars("AAAA"), UniversalMethod::Lz78).unwrap();
        let stats = report.dictionary.as_ref().unwrap();
        assert_eq!(stats.dictionary_size, 3);
        assert_eq!(stats.patterns_found, 1);
        assert_eq!(stats.longest_pattern, chars("AA"));
        assert_eq!(report.encoded_length, 8);
        assert_eq!(report.fixed_length, 4);
        assert!(report.compression_ratio() < 0.0);
        assert!(report.lossless);
    }

    #[test]
    fn test_universal_arithmetic() {
        let report =
            UniversalReport::analyze(&chars("ABBCA"), UniversalMethod::Arithmetic).unwrap();
        assert!(report.lossless);
        assert!(report.dictionary.is_none());
        assert_eq!(report.fixed_length, 10);

        let text = report.export_text();
        assert!(text.contains("method=arithmetic"));
        assert!(text.contains("sequence_length=5"));
    }

    #[test]
    fn test_batch_continues_past_failure() {
        let cases = vec![
            ("S1".to_string(), chars("ABBCA")),
            ("empty".to_string(), Vec::new()),
            ("S2".to_string(), chars("ABCABACBABCCACBAABBCCABAABB")),
        ];
        let batch = analyze_batch(&cases, UniversalMethod::Lz78);

        assert_eq!(batch.summary.cases, 3);
        assert_eq!(batch.summary.failed, 1);
        assert!(batch.summary.all_lossless);
        assert!(matches!(batch.cases[1].outcome, Err(Error::EmptyInput)));
        assert!(batch.report("S2").is_some());
        assert!(batch.report("empty").is_none());

        let s1 = batch.report("S1").unwrap().efficiency();
        let s2 = batch.report("S2").unwrap().efficiency();
        assert!((batch.summary.average_efficiency - (s1 + s2) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_batch_all_failed() {
        let cases: Vec<(String, Vec<char>)> = vec![("empty".to_string(), Vec::new())];
        let batch = analyze_batch(&cases, UniversalMethod::Arithmetic);
        assert!(!batch.summary.all_lossless);
        assert_eq!(batch.summary.average_efficiency, 0.0);
    }

    #[test]
    fn test_analyze_text_filters() {
        let allowed: HashSet<char> = "ab".chars().collect();
        let report = analyze_text("a!b?a", &allowed).unwrap();
        assert_eq!(report.sequence_length, 3);
        assert!(matches!(analyze_text("!?", &allowed), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_bsc_text_noiseless() {
        use rand::SeedableRng;
        let allowed: HashSet<char> = "abc ".chars().collect();
        let channel = BinarySymmetricChannel::new(0.0).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);

        let report = bsc_text_experiment("a cab!", &allowed, &channel, &mut rng).unwrap();
        assert_eq!(report.code_width, 2);
        assert_eq!(report.sent_bits, 10);
        assert_eq!(report.bit_errors, 0);
        assert_eq!(report.decoded_text, "a cab");
        assert_eq!(report.entropies.conditional, 0.0);
    }

    #[test]
    fn test_bsc_text_noisy() {
        use rand::SeedableRng;
        let allowed: HashSet<char> = ('a'..='z').collect();
        let channel = BinarySymmetricChannel::new(0.05).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);

        let text = "informationtheory".repeat(50);
        let report = bsc_text_experiment(&text, &allowed, &channel, &mut rng).unwrap();
        assert_eq!(report.code_width, 5);
        assert!(report.bit_errors > 0);
        assert!(report.decoded_text.len() <= report.original_length);
        let expected_joint = report.entropies.source + report.entropies.conditional;
        assert!((report.entropies.joint - expected_joint).abs() < 1e-12);
    }
}
