//! Configuration for the infocode application.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including a random test sequence that is reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, using intelligent defaults.
//! The seed is printed with `--print-config` so runs are reproducible.

use infocode_core::block::CodingScheme;
use infocode_core::channel::{ChannelKind, SimulationConfig};
use std::path::PathBuf;

/// Default crossover probability of the binary symmetric channel.
pub const DEFAULT_CROSSOVER: f64 = 0.05;

/// What the run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// PMF, entropy and relative entropy of the input text
    Entropy,
    /// Fixed, Huffman and Shannon-Fano coding of the input text
    Source,
    /// Adaptive arithmetic coding of a sequence or the test batch
    Arithmetic,
    /// LZ78 coding of a sequence or the test batch
    Lz78,
    /// BER sweep over AWGN or Rayleigh fading
    Ber,
    /// Fixed-length text over a binary symmetric channel
    Bsc,
}

impl Command {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "entropy" => Some(Command::Entropy),
            "source" => Some(Command::Source),
            "arithmetic" => Some(Command::Arithmetic),
            "lz78" => Some(Command::Lz78),
            "ber" => Some(Command::Ber),
            "bsc" => Some(Command::Bsc),
            _ => None,
        }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Input ===
    /// Literal input text
    pub text: Option<String>,

    /// Input file path
    pub input_file: Option<PathBuf>,

    /// Named test sequence (S1, S2, S3, random)
    pub sequence: Option<String>,

    // === Channel ===
    /// BER sweep parameters
    pub simulation: SimulationConfig,

    /// BSC crossover probability
    pub crossover: f64,

    // === Behavior ===
    /// Seed for every random draw
    pub seed: u64,

    /// Whether to print detailed config
    pub print_config: bool,
}

/// Next argument as the value of `flag`.
fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_value<T: std::str::FromStr>(
    args: &[String],
    i: &mut usize,
    flag: &str,
) -> Result<T, String> {
    let raw = flag_value(args, i, flag)?;
    raw.parse()
        .map_err(|_| format!("invalid value for {flag}: {raw}"))
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// The first argument may name a command; the default is `source`.
    /// Without `--seed` a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut command = Command::Source;
        let mut text: Option<String> = None;
        let mut input_file: Option<PathBuf> = None;
        let mut sequence: Option<String> = None;
        let mut seed: Option<u64> = None;
        let mut channel: Option<ChannelKind> = None;
        let mut coding: Option<CodingScheme> = None;
        let mut snr_start: Option<f64> = None;
        let mut snr_end: Option<f64> = None;
        let mut snr_step: Option<f64> = None;
        let mut num_bits: Option<usize> = None;
        let mut crossover: Option<f64> = None;
        let mut print_config = false;

        let mut i = 0;
        if let Some(first) = args.first().and_then(|a| Command::parse(a)) {
            command = first;
            i = 1;
        }

        while i < args.len() {
            match args[i].as_str() {
                "--text" => text = Some(flag_value(args, &mut i, "--text")?.to_string()),
                "--in" => input_file = Some(PathBuf::from(flag_value(args, &mut i, "--in")?)),
                "--seq" => sequence = Some(flag_value(args, &mut i, "--seq")?.to_string()),
                "--seed" => seed = Some(parse_value(args, &mut i, "--seed")?),
                "--channel" => {
                    let raw = flag_value(args, &mut i, "--channel")?;
                    channel = Some(raw.parse().map_err(|e| format!("{e}"))?);
                }
                "--coding" => {
                    let raw = flag_value(args, &mut i, "--coding")?;
                    coding = Some(raw.parse().map_err(|e| format!("{e}"))?);
                }
                "--snr-start" => snr_start = Some(parse_value(args, &mut i, "--snr-start")?),
                "--snr-end" => snr_end = Some(parse_value(args, &mut i, "--snr-end")?),
                "--snr-step" => snr_step = Some(parse_value(args, &mut i, "--snr-step")?),
                "--bits" => num_bits = Some(parse_value(args, &mut i, "--bits")?),
                "--crossover" => crossover = Some(parse_value(args, &mut i, "--crossover")?),
                "--print-config" => {
                    print_config = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    return Err(format!("unknown argument: {other}"));
                }
            }
            i += 1;
        }

        if text.is_some() && input_file.is_some() {
            return Err("--text and --in are mutually exclusive".to_string());
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        // a sweep without --coding compares against Hamming(7,4)
        let defaults = match command {
            Command::Ber => SimulationConfig::default_with_seed(seed),
            _ => SimulationConfig::uncoded(seed),
        };
        let simulation = SimulationConfig {
            channel: channel.unwrap_or(defaults.channel),
            coding: coding.unwrap_or(defaults.coding),
            num_bits: num_bits.unwrap_or(defaults.num_bits),
            ebn0_start_db: snr_start.unwrap_or(defaults.ebn0_start_db),
            ebn0_end_db: snr_end.unwrap_or(defaults.ebn0_end_db),
            ebn0_step_db: snr_step.unwrap_or(defaults.ebn0_step_db),
            seed,
        };

        Ok(Config {
            command,
            text,
            input_file,
            sequence,
            simulation,
            crossover: crossover.unwrap_or(DEFAULT_CROSSOVER),
            seed,
            print_config,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Command: {:?}", self.command);
        println!("Seed: {}", self.seed);
        match (&self.text, &self.input_file, &self.sequence) {
            (Some(_), _, _) => println!("Input: --text"),
            (_, Some(path), _) => println!("Input file: {}", path.display()),
            (_, _, Some(name)) => println!("Sequence: {name}"),
            _ => println!("Input: built-in"),
        }
        println!();

        match self.command {
            Command::Ber => {
                let sim = &self.simulation;
                println!("=== Channel Simulation ===");
                println!("Channel: {}", sim.channel);
                println!("Coding: {}", sim.coding.label());
                println!("Bits per point: {}", sim.num_bits);
                println!(
                    "Eb/N0: {} to {} dB, step {}",
                    sim.ebn0_start_db, sim.ebn0_end_db, sim.ebn0_step_db
                );
                println!();
            }
            Command::Bsc => {
                println!("=== Binary Symmetric Channel ===");
                println!("Crossover: {}", self.crossover);
                println!();
            }
            _ => {}
        }
    }
}

fn print_help() {
    println!("infocode: Source coding and channel coding experiments");
    println!();
    println!("USAGE:");
    println!("    infocode [COMMAND] [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    entropy                 PMF, entropy and relative entropy of a text");
    println!("    source                  Fixed, Huffman and Shannon-Fano codes (default)");
    println!("    arithmetic              Adaptive arithmetic coding");
    println!("    lz78                    LZ78 dictionary coding");
    println!("    ber                     BER sweep for BPSK over AWGN or Rayleigh");
    println!("    bsc                     Text over a binary symmetric channel");
    println!();
    println!("OPTIONS:");
    println!("    --text <TEXT>           Input text");
    println!("    --in <PATH>             Input file");
    println!("    --seq <NAME>            Test sequence: S1, S2, S3 or random");
    println!("    --seed <N>              Random seed for determinism");
    println!();
    println!("    --channel <KIND>        awgn or rayleigh (default: awgn)");
    println!("    --coding <SCHEME>       uncoded, rep3, rep5, ham74, ham1511 (default: ham74)");
    println!("    --snr-start <DB>        First Eb/N0 point (default: 0)");
    println!("    --snr-end <DB>          Last Eb/N0 point (default: 10)");
    println!("    --snr-step <DB>         Eb/N0 step (default: 2)");
    println!("    --bits <N>              Bits per point (default: 100000)");
    println!("    --crossover <P>         BSC crossover probability (default: 0.05)");
    println!();
    println!("    --print-config          Print resolved configuration");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    infocode                                  # Source codes for the sample text");
    println!("    infocode lz78 --seed 42                   # LZ78 over all test sequences");
    println!("    infocode arithmetic --seq S2              # One named sequence");
    println!("    infocode ber --coding rep3 --channel rayleigh");
    println!("    infocode bsc --in notes.txt --crossover 0.1");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(&args(&["--seed", "5"])).unwrap();
        assert_eq!(config.command, Command::Source);
        assert_eq!(config.seed, 5);
        assert_eq!(config.simulation.seed, 5);
        assert_eq!(config.simulation.coding, CodingScheme::Uncoded);
        assert_eq!(config.crossover, DEFAULT_CROSSOVER);
    }

    #[test]
    fn test_ber_flags() {
        let config = Config::from_args(&args(&[
            "ber",
            "--channel",
            "rayleigh",
            "--coding",
            "ham1511",
            "--snr-end",
            "6",
            "--bits",
            "1000",
        ]))
        .unwrap();
        assert_eq!(config.command, Command::Ber);
        assert_eq!(config.simulation.channel, ChannelKind::Rayleigh);
        assert_eq!(config.simulation.coding, CodingScheme::Hamming1511);
        assert_eq!(config.simulation.ebn0_end_db, 6.0);
        assert_eq!(config.simulation.num_bits, 1000);
    }

    #[test]
    fn test_ber_defaults_to_hamming() {
        let config = Config::from_args(&args(&["ber", "--seed", "9"])).unwrap();
        assert_eq!(config.simulation.coding, CodingScheme::Hamming74);
        assert_eq!(config.simulation.channel, ChannelKind::Awgn);
        assert_eq!(config.simulation.seed, 9);

        let uncoded = Config::from_args(&args(&["ber", "--coding", "uncoded"])).unwrap();
        assert_eq!(uncoded.simulation.coding, CodingScheme::Uncoded);
    }

    #[test]
    fn test_errors() {
        assert!(Config::from_args(&args(&["--seed"])).is_err());
        assert!(Config::from_args(&args(&["--bits", "many"])).is_err());
        assert!(Config::from_args(&args(&["--coding", "turbo"])).is_err());
        assert!(Config::from_args(&args(&["--frobnicate"])).is_err());
        assert!(Config::from_args(&args(&["--text", "a", "--in", "b"])).is_err());
    }
}
