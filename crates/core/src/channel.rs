//! Noisy channel simulation with BPSK, AWGN and Rayleigh fading.
//!
//! All randomness comes from an `Rng` passed in by the caller. Seed a
//! `ChaCha8Rng` and the same inputs give bit-identical results.
//!
//! # Signal model
//!
//! - **Energy**: one information bit carries `Eb = 1`. A rate `k/n` code sends
//!   `n/k` channel bits per information bit, so each channel symbol gets
//!   `Es = k/n`.
//! - **BPSK**: bit `b` maps to `√Es·(2b − 1)`.
//! - **AWGN**: zero-mean Gaussian noise with variance `N0/2`, where
//!   `N0 = Eb / 10^(EbN0_dB/10)`.
//! - **Rayleigh**: every sample is scaled by the real part of a fresh
//!   `h = (x + jy)/√2` with `x, y ~ N(0, 1)`, then noise is added and the
//!   receiver divides by `Re(h)` (zero-forcing).
//! - **Detection**: hard decision, amplitude `> 0` is a 1.

use crate::bitio::BitString;
use crate::block::{BlockCode, CodingScheme};
use crate::error::{Error, Result};
use crate::model::{binary_entropy, ChannelEntropy};
use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use statrs::distribution::Normal;
use statrs::function::erf::erfc;
use std::fmt;
use std::str::FromStr;

/// Energy per information bit.
const EB: f64 = 1.0;

/// Noise model applied to the modulated signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Awgn,
    Rayleigh,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Awgn => write!(f, "awgn"),
            ChannelKind::Rayleigh => write!(f, "rayleigh"),
        }
    }
}

impl FromStr for ChannelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "awgn" => Ok(ChannelKind::Awgn),
            "rayleigh" => Ok(ChannelKind::Rayleigh),
            other => Err(Error::InvalidParameter(format!("unknown channel: {other}"))),
        }
    }
}

/// Noise spectral density for a given Eb/N0 in dB.
pub fn noise_density(ebn0_db: f64) -> f64 {
    EB / 10f64.powf(ebn0_db / 10.0)
}

/// Map bits to BPSK amplitudes `√Es·(2b − 1)`.
pub fn bpsk_modulate(bits: &[bool], es: f64) -> Vec<f64> {
    let amplitude = es.sqrt();
    bits.iter()
        .map(|&b| if b { amplitude } else { -amplitude })
        .collect()
}

/// Hard decision: positive amplitude is a 1.
pub fn bpsk_demodulate(samples: &[f64]) -> BitString {
    samples.iter().map(|&x| x > 0.0).collect()
}

fn noise_distribution(ebn0_db: f64) -> Result<Normal> {
    let sigma = (noise_density(ebn0_db) / 2.0).sqrt();
    Normal::new(0.0, sigma).map_err(|e| {
        Error::InvalidParameter(format!("no noise model for Eb/N0 {ebn0_db} dB: {e}"))
    })
}

/// Add white Gaussian noise of variance `N0/2`.
pub fn add_awgn<R: Rng + ?Sized>(signal: &[f64], ebn0_db: f64, rng: &mut R) -> Result<Vec<f64>> {
    let noise = noise_distribution(ebn0_db)?;
    Ok(signal.iter().map(|&x| x + noise.sample(rng)).collect())
}

/// Apply Rayleigh fading and noise, then zero-forcing equalisation.
pub fn rayleigh_fade<R: Rng + ?Sized>(
    signal: &[f64],
    ebn0_db: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let noise = noise_distribution(ebn0_db)?;
    // Re(h) for h = (a + jb)/√2 is N(0, 1/2)
    let fading = Normal::new(0.0, std::f64::consts::FRAC_1_SQRT_2)
        .map_err(|e| Error::InvalidParameter(format!("fading distribution: {e}")))?;

    Ok(signal
        .iter()
        .map(|&x| {
            let re_h = fading.sample(rng);
            let received = re_h * x + noise.sample(rng);
            received / re_h
        })
        .collect())
}

/// Positions where `a` and `b` differ. Bits missing from the shorter
/// sequence count as errors.
pub fn count_bit_errors(a: &[bool], b: &[bool]) -> usize {
    let mismatched = a.iter().zip(b).filter(|(x, y)| x != y).count();
    mismatched + a.len().abs_diff(b.len())
}

/// Fraction of `sent` bits that `received` got wrong. Zero for empty input.
pub fn compute_ber(sent: &[bool], received: &[bool]) -> f64 {
    if sent.is_empty() {
        return 0.0;
    }
    count_bit_errors(sent, received) as f64 / sent.len() as f64
}

/// Gaussian tail probability `Q(x) = ½·erfc(x/√2)`.
pub fn q_function(x: f64) -> f64 {
    0.5 * erfc(x / std::f64::consts::SQRT_2)
}

/// Uncoded BPSK over AWGN: `Q(√(2·Eb/N0))`.
pub fn theoretical_bpsk_ber(ebn0_db: f64) -> f64 {
    let ebn0 = 10f64.powf(ebn0_db / 10.0);
    q_function((2.0 * ebn0).sqrt())
}

/// One pass of bits through encoder, channel and decoder.
#[derive(Debug, Clone)]
pub struct ChannelRecord {
    /// Information bits as supplied
    pub transmitted: BitString,
    /// Bits put on the channel (equal to `transmitted` when uncoded)
    pub coded: BitString,
    /// Hard decisions at the receiver, before decoding
    pub received: BitString,
    /// Information bits after decoding
    pub decoded: BitString,
    pub bit_errors: usize,
    pub ber: f64,
}

/// Send `bits` through `kind` at `ebn0_db`, optionally protected by `code`.
///
/// # Errors
/// - `Error::EmptyInput` if `bits` is empty
/// - `Error::InvalidLength` if `bits` is not a whole number of code blocks
pub fn simulate_channel<R: Rng + ?Sized>(
    bits: &[bool],
    kind: ChannelKind,
    ebn0_db: f64,
    code: Option<&dyn BlockCode>,
    rng: &mut R,
) -> Result<ChannelRecord> {
    if bits.is_empty() {
        return Err(Error::EmptyInput);
    }

    let (coded, es) = match code {
        Some(code) => (code.encode(bits)?, code.rate()),
        None => (BitString::from(bits), 1.0),
    };

    let tx = bpsk_modulate(&coded, es);
    let rx = match kind {
        ChannelKind::Awgn => add_awgn(&tx, ebn0_db, rng)?,
        ChannelKind::Rayleigh => rayleigh_fade(&tx, ebn0_db, rng)?,
    };
    let received = bpsk_demodulate(&rx);

    let decoded = match code {
        Some(code) => code.decode(&received)?,
        None => received.clone(),
    };

    let bit_errors = count_bit_errors(bits, &decoded);
    Ok(ChannelRecord {
        transmitted: BitString::from(bits),
        coded,
        received,
        decoded,
        bit_errors,
        ber: bit_errors as f64 / bits.len() as f64,
    })
}

/// `count` uniformly random bits.
pub fn random_bits<R: Rng + ?Sized>(count: usize, rng: &mut R) -> BitString {
    (0..count).map(|_| rng.gen::<bool>()).collect()
}

/// Largest number of Eb/N0 points one sweep may ask for.
pub const MAX_EBN0_POINTS: usize = 10_000;

/// Parameters of a BER sweep.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub channel: ChannelKind,
    pub coding: CodingScheme,

    /// Information bits per point (rounded up to whole code blocks)
    pub num_bits: usize,

    /// First Eb/N0 point in dB
    pub ebn0_start_db: f64,

    /// Last Eb/N0 point in dB (inclusive)
    pub ebn0_end_db: f64,

    /// Spacing between points in dB
    pub ebn0_step_db: f64,

    /// Random seed for determinism
    pub seed: u64,
}

impl SimulationConfig {
    /// Uncoded BPSK over AWGN, 0 to 10 dB in 2 dB steps.
    pub fn uncoded(seed: u64) -> Self {
        Self {
            channel: ChannelKind::Awgn,
            coding: CodingScheme::Uncoded,
            num_bits: 100_000,
            ebn0_start_db: 0.0,
            ebn0_end_db: 10.0,
            ebn0_step_db: 2.0,
            seed,
        }
    }

    /// Hamming(7,4) over AWGN, 0 to 10 dB in 2 dB steps.
    pub fn default_with_seed(seed: u64) -> Self {
        Self {
            coding: CodingScheme::Hamming74,
            ..Self::uncoded(seed)
        }
    }

    /// Eb/N0 points from start to end inclusive.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` for a non-positive step, an end
    /// below the start, or more than [`MAX_EBN0_POINTS`] points.
    pub fn ebn0_points(&self) -> Result<Vec<f64>> {
        let (start, end, step) = (self.ebn0_start_db, self.ebn0_end_db, self.ebn0_step_db);
        if step.is_nan() || step <= 0.0 || !start.is_finite() || !end.is_finite() || end < start {
            return Err(Error::InvalidParameter(format!(
                "bad Eb/N0 range {start}..={end} step {step}"
            )));
        }
        let count = ((end - start) / step + 1e-9).floor() + 1.0;
        if !count.is_finite() || count > MAX_EBN0_POINTS as f64 {
            return Err(Error::InvalidParameter(format!(
                "Eb/N0 range {start}..={end} step {step} gives more than \
                 {MAX_EBN0_POINTS} points"
            )));
        }
        Ok((0..count as usize).map(|i| start + i as f64 * step).collect())
    }

    /// `num_bits` rounded up to a multiple of `k`.
    pub fn padded_bits(&self) -> usize {
        let (k, _) = self.coding.dimensions();
        self.num_bits.div_ceil(k) * k
    }
}

/// Measured and reference BER at one Eb/N0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BerPoint {
    pub ebn0_db: f64,
    pub bit_errors: usize,
    pub ber: f64,
    /// Uncoded BPSK over AWGN at the same Eb/N0
    pub theoretical: f64,
}

/// Run `simulate_channel` at every Eb/N0 point of `config`, drawing fresh
/// random bits per point from one seeded generator.
pub fn simulate_ber_curve(config: &SimulationConfig) -> Result<Vec<BerPoint>> {
    let points = config.ebn0_points()?;
    let num_bits = config.padded_bits();
    if num_bits == 0 {
        return Err(Error::EmptyInput);
    }

    let code = config.coding.code();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut curve = Vec::with_capacity(points.len());

    for ebn0_db in points {
        let bits = random_bits(num_bits, &mut rng);
        let record = simulate_channel(&bits, config.channel, ebn0_db, code.as_deref(), &mut rng)?;
        let point = BerPoint {
            ebn0_db,
            bit_errors: record.bit_errors,
            ber: record.ber,
            theoretical: theoretical_bpsk_ber(ebn0_db),
        };

        tracing::info!(
            channel = %config.channel,
            coding = config.coding.label(),
            ebn0_db,
            bits = num_bits,
            errors = point.bit_errors,
            ber = point.ber,
            "BER point"
        );
        curve.push(point);
    }

    Ok(curve)
}

/// Binary symmetric channel with crossover probability `p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinarySymmetricChannel {
    crossover: f64,
}

impl BinarySymmetricChannel {
    /// # Errors
    /// Returns `Error::InvalidParameter` unless `0 <= p <= 1`.
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::InvalidParameter(format!(
                "crossover probability {p} outside [0, 1]"
            )));
        }
        Ok(Self { crossover: p })
    }

    pub fn crossover(&self) -> f64 {
        self.crossover
    }

    /// Flip each bit independently with probability `p`.
    pub fn transmit<R: Rng + ?Sized>(&self, bits: &[bool], rng: &mut R) -> BitString {
        bits.iter()
            .map(|&b| b ^ rng.gen_bool(self.crossover))
            .collect()
    }

    /// `H(Y|X) = Hb(p)`.
    pub fn conditional_entropy(&self) -> f64 {
        binary_entropy(self.crossover)
    }

    /// Source, conditional and joint entropy for a source of entropy
    /// `source_entropy` sent over this channel.
    pub fn entropies(&self, source_entropy: f64) -> ChannelEntropy {
        ChannelEntropy::for_bsc(source_entropy, self.crossover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{RepetitionCode, HAMMING_7_4};

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_bpsk_mapping() {
        let bits: BitString = "10".parse().unwrap();
        assert_eq!(bpsk_modulate(&bits, 1.0), vec![1.0, -1.0]);

        let scaled = bpsk_modulate(&bits, 0.25);
        assert!((scaled[0] - 0.5).abs() < 1e-12);
        assert_eq!(bpsk_demodulate(&[0.3, -0.1, 0.0]).to_string(), "100");
    }

    #[test]
    fn test_noise_density() {
        assert!((noise_density(0.0) - 1.0).abs() < 1e-12);
        assert!((noise_density(10.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_theoretical_ber() {
        assert!((q_function(0.0) - 0.5).abs() < 1e-12);
        // Q(√2) at 0 dB
        assert!((theoretical_bpsk_ber(0.0) - 0.078_649_6).abs() < 1e-6);
        assert!(theoretical_bpsk_ber(10.0) < 1e-5);
    }

    #[test]
    fn test_uncoded_awgn_ber_at_0db() {
        let mut rng = rng(7);
        let bits = random_bits(100_000, &mut rng);
        let record = simulate_channel(&bits, ChannelKind::Awgn, 0.0, None, &mut rng).unwrap();

        let expected = theoretical_bpsk_ber(0.0);
        let relative = (record.ber - expected).abs() / expected;
        assert!(relative < 0.2, "ber {} vs {}", record.ber, expected);
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let bits = random_bits(2_000, &mut rng(1));
        let a = simulate_channel(&bits, ChannelKind::Rayleigh, 4.0, None, &mut rng(9)).unwrap();
        let b = simulate_channel(&bits, ChannelKind::Rayleigh, 4.0, None, &mut rng(9)).unwrap();
        assert_eq!(a.received, b.received);
        assert_eq!(a.bit_errors, b.bit_errors);
    }

    #[test]
    fn test_coded_record_lengths() {
        let bits = random_bits(400, &mut rng(3));
        let record = simulate_channel(
            &bits,
            ChannelKind::Awgn,
            6.0,
            Some(&HAMMING_7_4),
            &mut rng(4),
        )
        .unwrap();
        assert_eq!(record.coded.len(), 700);
        assert_eq!(record.received.len(), 700);
        assert_eq!(record.decoded.len(), 400);
    }

    #[test]
    fn test_high_snr_is_error_free() {
        let bits = random_bits(5_000, &mut rng(5));
        let code = RepetitionCode::RATE_1_3;
        let record =
            simulate_channel(&bits, ChannelKind::Awgn, 20.0, Some(&code), &mut rng(6)).unwrap();
        assert_eq!(record.bit_errors, 0);
        assert_eq!(record.decoded, record.transmitted);
    }

    #[test]
    fn test_rayleigh_worse_than_awgn() {
        let bits = random_bits(50_000, &mut rng(11));
        let awgn = simulate_channel(&bits, ChannelKind::Awgn, 8.0, None, &mut rng(12)).unwrap();
        let fading =
            simulate_channel(&bits, ChannelKind::Rayleigh, 8.0, None, &mut rng(12)).unwrap();
        assert!(fading.ber > awgn.ber);
    }

    #[test]
    fn test_simulate_rejects_bad_input() {
        assert!(matches!(
            simulate_channel(&[], ChannelKind::Awgn, 0.0, None, &mut rng(0)),
            Err(Error::EmptyInput)
        ));
        let bits = random_bits(5, &mut rng(0));
        assert!(matches!(
            simulate_channel(&bits, ChannelKind::Awgn, 0.0, Some(&HAMMING_7_4), &mut rng(0)),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_ebn0_points_inclusive() {
        let config = SimulationConfig::uncoded(0);
        assert_eq!(
            config.ebn0_points().unwrap(),
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        );

        let bad = SimulationConfig {
            ebn0_step_db: 0.0,
            ..config
        };
        assert!(bad.ebn0_points().is_err());
    }

    #[test]
    fn test_ebn0_points_rejects_tiny_step() {
        let tiny = SimulationConfig {
            ebn0_step_db: 1e-300,
            ..SimulationConfig::uncoded(0)
        };
        assert!(matches!(tiny.ebn0_points(), Err(Error::InvalidParameter(_))));

        let too_many = SimulationConfig {
            ebn0_step_db: 1e-4,
            ..SimulationConfig::uncoded(0)
        };
        assert!(too_many.ebn0_points().is_err());

        let at_limit = SimulationConfig {
            ebn0_end_db: (MAX_EBN0_POINTS - 1) as f64,
            ebn0_step_db: 1.0,
            ..SimulationConfig::uncoded(0)
        };
        assert_eq!(at_limit.ebn0_points().unwrap().len(), MAX_EBN0_POINTS);
    }

    #[test]
    fn test_default_preset_is_hamming() {
        let config = SimulationConfig::default_with_seed(3);
        assert_eq!(config.coding, CodingScheme::Hamming74);
        assert_eq!(config.channel, ChannelKind::Awgn);
        assert_eq!(config.seed, 3);
        assert_eq!(config.ebn0_points().unwrap().len(), 6);
        assert_eq!(config.padded_bits(), 100_000);
    }

    #[test]
    fn test_padding_to_code_blocks() {
        let config = SimulationConfig {
            coding: CodingScheme::Hamming1511,
            num_bits: 100,
            ..SimulationConfig::uncoded(0)
        };
        assert_eq!(config.padded_bits(), 110);
    }

    #[test]
    fn test_ber_curve_decreases() {
        let config = SimulationConfig {
            num_bits: 20_000,
            ebn0_end_db: 6.0,
            ..SimulationConfig::uncoded(42)
        };
        let curve = simulate_ber_curve(&config).unwrap();
        assert_eq!(curve.len(), 4);
        assert!(curve[0].ber > curve[3].ber);
        assert!(curve.iter().all(|p| p.theoretical > 0.0));

        let again = simulate_ber_curve(&config).unwrap();
        assert_eq!(curve, again);
    }

    #[test]
    fn test_bsc_flips() {
        let bits = random_bits(1_000, &mut rng(2));
        let clean = BinarySymmetricChannel::new(0.0).unwrap();
        assert_eq!(clean.transmit(&bits, &mut rng(3)), bits);

        let inverting = BinarySymmetricChannel::new(1.0).unwrap();
        let flipped = inverting.transmit(&bits, &mut rng(3));
        assert_eq!(count_bit_errors(&bits, &flipped), 1_000);

        assert!(BinarySymmetricChannel::new(1.5).is_err());
    }

    #[test]
    fn test_bsc_entropy() {
        let bsc = BinarySymmetricChannel::new(0.5).unwrap();
        assert!((bsc.conditional_entropy() - 1.0).abs() < 1e-12);
        let h = bsc.entropies(2.0);
        assert!((h.joint - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_count_bit_errors_length_mismatch() {
        let a: BitString = "1010".parse().unwrap();
        let b: BitString = "10".parse().unwrap();
        assert_eq!(count_bit_errors(&a, &b), 2);
        assert_eq!(compute_ber(&a, &a), 0.0);
    }
}
