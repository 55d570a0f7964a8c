//! Built-in input sequences.
//!
//! When no input is given, commands run over the named test sequences: two
//! short letter sequences, one sentence, and a random sequence over `A..E`
//! whose length and content come from the seed.
//!
//! # Tokens
//!
//! A sequence is read as whitespace-separated tokens, so `"A B B C A"` has
//! five symbols and the sentence `S3` has one symbol per word.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

pub const S1: &str = "A B B C A";
pub const S2: &str = "A B C A B A C B A B C C A C B A A B B C C A B A A B B";
pub const S3: &str = "This is a longer test sequence with more characters to analyze \
                      compression performance on longer text sequences.";

/// Characters kept by the text analyses.
pub const VALID_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ ,.0123456789";

/// Fallback text for the character-level commands.
pub const SAMPLE_TEXT: &str = "Information theory studies the quantification, storage, \
                               and communication of information. A source with entropy H \
                               cannot be compressed below H bits per symbol on average.";

/// `VALID_CHARS` as a set.
pub fn valid_charset() -> HashSet<char> {
    VALID_CHARS.chars().collect()
}

/// Split a sequence into whitespace-separated tokens.
pub fn tokenize(sequence: &str) -> Vec<String> {
    sequence.split_whitespace().map(str::to_string).collect()
}

/// Random sequence of 20 to 49 letters drawn from `A..E`, space separated.
pub fn random_sequence(seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let length = rng.gen_range(20..50);
    let letters: Vec<String> = (0..length)
        .map(|_| char::from(b'A' + rng.gen_range(0..5u8)).to_string())
        .collect();
    letters.join(" ")
}

/// Look up a named sequence (`S1`, `S2`, `S3` or `random`).
pub fn named_sequence(name: &str, seed: u64) -> Option<String> {
    match name.to_ascii_lowercase().as_str() {
        "s1" => Some(S1.to_string()),
        "s2" => Some(S2.to_string()),
        "s3" => Some(S3.to_string()),
        "random" => Some(random_sequence(seed)),
        _ => None,
    }
}

/// All named sequences, tokenized, in display order.
pub fn test_cases(seed: u64) -> Vec<(String, Vec<String>)> {
    ["S1", "S2", "S3", "random"]
        .into_iter()
        .filter_map(|name| named_sequence(name, seed).map(|s| (name.to_string(), tokenize(&s))))
        .collect()
}
